use super::annotate::{Annotation, AnnotationRequest, Annotator};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

#[derive(Debug)]
pub struct BatchOutcome {
    pub request: AnnotationRequest,
    pub result: Result<Annotation, EngineError>,
}

/// Annotates `requests` in parallel on the current rayon pool.
///
/// Outcomes come back in input order. A failing request is reported in its
/// own outcome and does not stop the rest of the batch.
#[instrument(skip_all, name = "batch_workflow", fields(requests = requests.len()))]
pub fn annotate_batch(
    annotator: &Annotator,
    requests: &[AnnotationRequest],
    reporter: &ProgressReporter,
) -> Vec<BatchOutcome> {
    reporter.report(Progress::TaskStart {
        total_steps: requests.len() as u64,
    });

    let outcomes: Vec<BatchOutcome> = requests
        .par_iter()
        .map(|request| {
            let result = annotator.annotate(request);
            if let Err(e) = &result {
                warn!(peptide = %request.peptide, notation = %request.notation, error = %e, "Annotation failed.");
                reporter.report(Progress::Message(format!(
                    "{} {}: {}",
                    request.peptide, request.notation, e
                )));
            }
            reporter.report(Progress::TaskIncrement);
            BatchOutcome {
                request: request.clone(),
                result,
            }
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let queued = outcomes
        .iter()
        .filter(|o| matches!(o.result, Ok(Annotation::Pending { queued: true })))
        .count();
    info!(
        total = outcomes.len(),
        failed, queued, "Batch annotation finished."
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::CacheConfigBuilder;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tempfile::TempDir;

    fn annotator(dir: &TempDir) -> Annotator {
        let cache_root = dir.path().join("cache");
        fs::create_dir(&cache_root).unwrap();
        let config = CacheConfigBuilder::new()
            .cache_root(cache_root)
            .job_queue(dir.path().join("jobs.txt"))
            .build()
            .unwrap();
        Annotator::new(config).unwrap()
    }

    #[test]
    fn parallel_requests_on_shared_peptides_converge() {
        let dir = TempDir::new().unwrap();
        let annotator = annotator(&dir);

        let mut requests = Vec::new();
        for position in 1..=40 {
            requests.push(AnnotationRequest::new(
                "ENSP001",
                "MAVLKAGLVW",
                format!("Ala{}Val", position),
            ));
            requests.push(AnnotationRequest::new(
                "ENSP002",
                "MEEPQSDPSV",
                format!("Gly{}*", position),
            ));
        }
        requests.push(AnnotationRequest::new("ENSP001", "MAVLKAGLVW", "Ser3="));

        let increments = AtomicU64::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
            if let Progress::TaskIncrement = event {
                increments.fetch_add(1, Ordering::SeqCst);
            }
        }));

        let outcomes = annotate_batch(&annotator, &requests, &reporter);
        drop(reporter);

        assert_eq!(outcomes.len(), requests.len());
        assert_eq!(increments.load(Ordering::SeqCst), requests.len() as u64);
        for (outcome, request) in outcomes.iter().zip(&requests) {
            assert_eq!(&outcome.request, request);
        }
        assert_eq!(
            outcomes.last().unwrap().result.as_ref().unwrap(),
            &Annotation::Synonymous
        );

        let var1 = fs::read_to_string(dir.path().join("cache/ENSP001/ENSP001.var")).unwrap();
        assert_eq!(var1.lines().count(), 40);
        let var2 = fs::read_to_string(dir.path().join("cache/ENSP002/ENSP002.var")).unwrap();
        assert_eq!(var2.lines().count(), 40);
        assert!(var2.lines().all(|l| l.starts_with('G') && l.ends_with("del")));

        let queue = fs::read_to_string(dir.path().join("jobs.txt")).unwrap();
        let mut lines: Vec<&str> = queue.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["ENSP001", "ENSP002"]);

        let queued_true = outcomes
            .iter()
            .filter(|o| matches!(o.result, Ok(Annotation::Pending { queued: true })))
            .count();
        assert_eq!(queued_true, 2);
    }

    #[test]
    fn failures_are_reported_per_request() {
        let dir = TempDir::new().unwrap();
        let annotator = annotator(&dir);
        let requests = vec![
            AnnotationRequest::new("ENSP001", "", "Ala5Val"),
            AnnotationRequest::new("ENSP002", "MAVLK", "Ala5Val"),
        ];

        let outcomes = annotate_batch(&annotator, &requests, &ProgressReporter::new());

        assert!(matches!(
            outcomes[0].result,
            Err(EngineError::EmptySequence(_))
        ));
        assert_eq!(
            outcomes[1].result.as_ref().unwrap(),
            &Annotation::Pending { queued: true }
        );
    }
}
