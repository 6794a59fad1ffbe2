use super::load_sequences;
use crate::cli::AnnotateArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use pepcache::workflows::annotate::{Annotation, AnnotationRequest, Annotator};
use tracing::info;

pub fn run(args: AnnotateArgs, config: AppConfig) -> Result<()> {
    let annotator = Annotator::new(config.cache)?;
    let sequence = resolve_sequence(&args)?;

    let request = AnnotationRequest::new(args.peptide, sequence, args.notation);
    let annotation = annotator.annotate(&request)?;

    match &annotation {
        Annotation::Pending { queued: true } => {
            info!(peptide = %request.peptide, "Score pending; peptide added to the job queue.");
        }
        Annotation::Pending { queued: false } => {
            info!(peptide = %request.peptide, "Score pending.");
        }
        _ => {}
    }
    if let Some(score) = annotation.score() {
        println!("{}", score);
    }
    Ok(())
}

fn resolve_sequence(args: &AnnotateArgs) -> Result<String> {
    if let Some(sequence) = &args.sequence.sequence {
        return Ok(sequence.clone());
    }
    let Some(path) = &args.sequence.fasta else {
        return Err(CliError::Argument(
            "either --sequence or --fasta is required".to_string(),
        ));
    };
    let mut sequences = load_sequences(path)?;
    sequences.remove(&args.peptide).ok_or_else(|| {
        CliError::Argument(format!(
            "no record with id '{}' in '{}'",
            args.peptide,
            path.display()
        ))
    })
}
