use crate::config::AppConfig;
use crate::error::Result;
use pepcache::workflows::annotate::Annotator;
use tracing::info;

pub fn run(config: AppConfig) -> Result<()> {
    let annotator = Annotator::new(config.cache)?;
    let queued = annotator.queued()?;
    info!(
        "{} peptide(s) queued in {:?}",
        queued.len(),
        annotator.job_queue()
    );
    for key in queued {
        println!("{}", key);
    }
    Ok(())
}
