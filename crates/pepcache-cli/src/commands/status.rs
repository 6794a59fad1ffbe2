use crate::cli::StatusArgs;
use crate::config::AppConfig;
use crate::error::Result;
use pepcache::engine::store::PeptideStatus;
use pepcache::workflows::annotate::Annotator;

pub fn run(args: StatusArgs, config: AppConfig) -> Result<()> {
    let annotator = Annotator::new(config.cache)?;
    match annotator.status(&args.peptide)? {
        Some(status) => print!("{}", render(&status)),
        None => println!("No cache entry for peptide '{}'.", args.peptide),
    }
    Ok(())
}

fn render(status: &PeptideStatus) -> String {
    let pending = status.unscored();
    let unscored: Vec<&str> = pending.iter().map(|v| v.as_str()).collect();
    let mut out = format!("peptide:   {}\n", status.key);
    out.push_str(&format!(
        "sequence:  {}\n",
        if status.has_sequence { "present" } else { "missing" }
    ));
    out.push_str(&format!("variants:  {}\n", status.variants.len()));
    out.push_str(&format!("scored:    {}\n", status.scores.len()));
    out.push_str(&format!("unscored:  {}\n", unscored.join(" ")));
    out
}
