use super::load_sequences;
use crate::cli::BatchArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::parser::{VariantLine, parse_variant_line};
use crate::utils::progress::CliProgressHandler;
use pepcache::engine::error::EngineError;
use pepcache::engine::progress::ProgressReporter;
use pepcache::workflows::annotate::{Annotation, AnnotationRequest, Annotator};
use pepcache::workflows::batch::{BatchOutcome, annotate_batch};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

const HEADER: &str = "#peptide\tnotation\tstatus\tscore";

pub fn run(args: BatchArgs, config: AppConfig) -> Result<()> {
    let annotator = Annotator::new(config.cache)?;
    let sequences = load_sequences(&args.fasta)?;
    let lines = read_variant_lines(&args.variants)?;
    info!("Read {} variant(s) from {:?}", lines.len(), &args.variants);

    let mut requests = Vec::with_capacity(lines.len());
    let mut unmatched = Vec::new();
    for line in lines {
        match sequences.get(&line.peptide) {
            Some(sequence) => {
                requests.push(AnnotationRequest::new(
                    line.peptide,
                    sequence.clone(),
                    line.notation,
                ));
            }
            None => {
                warn!(peptide = %line.peptide, "No sequence for peptide; variant skipped.");
                unmatched.push(line);
            }
        }
    }

    let progress_handler = CliProgressHandler::new("Annotating");
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let outcomes = annotate_batch(&annotator, &requests, &reporter);

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count() + unmatched.len();
    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            write_results(&mut BufWriter::new(file), &outcomes, &unmatched)?;
            info!("Results written to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            write_results(&mut stdout.lock(), &outcomes, &unmatched)?;
        }
    }

    if failed > 0 {
        eprintln!("⚠️  {} variant(s) could not be annotated; see the log for details.", failed);
    }
    Ok(())
}

fn read_variant_lines(path: &Path) -> Result<Vec<VariantLine>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let parsed = parse_variant_line(index + 1, &line).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        lines.extend(parsed);
    }
    Ok(lines)
}

fn status_label(result: &std::result::Result<Annotation, EngineError>) -> &'static str {
    match result {
        Ok(Annotation::Synonymous) => "synonymous",
        Ok(Annotation::Scored(_)) => "scored",
        Ok(Annotation::Pending { queued: false }) => "pending",
        Ok(Annotation::Pending { queued: true }) => "queued",
        Err(_) => "failed",
    }
}

fn write_results(
    writer: &mut impl Write,
    outcomes: &[BatchOutcome],
    unmatched: &[VariantLine],
) -> io::Result<()> {
    writeln!(writer, "{}", HEADER)?;
    for outcome in outcomes {
        let score = match &outcome.result {
            Ok(annotation) => annotation.score().unwrap_or(""),
            Err(_) => "",
        };
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            outcome.request.peptide,
            outcome.request.notation,
            status_label(&outcome.result),
            score
        )?;
    }
    for line in unmatched {
        writeln!(writer, "{}\t{}\tfailed\t", line.peptide, line.notation)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pepcache::engine::config::CacheConfigBuilder;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn app_config(dir: &TempDir) -> AppConfig {
        let cache_root = dir.path().join("cache");
        fs::create_dir(&cache_root).unwrap();
        AppConfig {
            cache: CacheConfigBuilder::new()
                .cache_root(cache_root)
                .job_queue(dir.path().join("jobs.txt"))
                .build()
                .unwrap(),
            threads: None,
        }
    }

    fn write_inputs(dir: &TempDir) -> (PathBuf, PathBuf) {
        let fasta = dir.path().join("proteins.fa");
        fs::write(&fasta, ">P1\nMAVLKAGLVW\n>P2\nMEEPQSDPSV\n").unwrap();
        let variants = dir.path().join("variants.tsv");
        fs::write(
            &variants,
            "# peptide\tnotation\nP1\tAla5Val\nP1:p.Ser3=\n\nP2\tGly9*\nP3\tAla1Val\n",
        )
        .unwrap();
        (fasta, variants)
    }

    #[test]
    fn status_labels_cover_every_outcome() {
        assert_eq!(status_label(&Ok(Annotation::Synonymous)), "synonymous");
        assert_eq!(status_label(&Ok(Annotation::Scored("1.0".into()))), "scored");
        assert_eq!(
            status_label(&Ok(Annotation::Pending { queued: false })),
            "pending"
        );
        assert_eq!(
            status_label(&Ok(Annotation::Pending { queued: true })),
            "queued"
        );
    }

    #[test]
    fn run_writes_one_row_per_variant() {
        let dir = tempdir().unwrap();
        let config = app_config(&dir);
        let (fasta, variants) = write_inputs(&dir);
        let output = dir.path().join("results.tsv");

        run(
            BatchArgs {
                fasta,
                variants,
                output: Some(output.clone()),
            },
            config,
        )
        .unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let rows: Vec<&str> = content.lines().collect();
        assert_eq!(rows[0], HEADER);
        assert_eq!(rows.len(), 5);
        assert!(rows.contains(&"P1\tp.Ser3=\tsynonymous\t0"));
        assert!(rows.contains(&"P2\tGly9*\tqueued\t"));
        assert_eq!(rows[4], "P3\tAla1Val\tfailed\t");
        assert!(rows.contains(&"P1\tAla5Val\tqueued\t"));

        let queue = fs::read_to_string(dir.path().join("jobs.txt")).unwrap();
        let mut queued: Vec<&str> = queue.lines().collect();
        queued.sort();
        assert_eq!(queued, vec!["P1", "P2"]);
        assert!(!dir.path().join("cache/P3").exists());
    }

    #[test]
    fn malformed_variants_file_is_rejected_before_annotating() {
        let dir = tempdir().unwrap();
        let config = app_config(&dir);
        let (fasta, variants) = write_inputs(&dir);
        fs::write(&variants, "P1 Ala5Val\n").unwrap();

        let result = run(
            BatchArgs {
                fasta,
                variants,
                output: Some(dir.path().join("results.tsv")),
            },
            config,
        );

        assert!(matches!(result, Err(CliError::FileParsing { .. })));
        assert!(fs::read_dir(dir.path().join("cache")).unwrap().next().is_none());
    }
}
