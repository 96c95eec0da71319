//! Classify command - show how the overlay sees individual files.

use std::path::{Path, PathBuf};

use txt2png::classify::{is_eligible_category, ClassifierError, ContentClassifier, SniffClassifier};

use crate::error::CliError;

/// Run the classify command.
pub fn run(paths: &[PathBuf]) -> Result<(), CliError> {
    let classifier = SniffClassifier::new();
    let mut failures = 0;

    for path in paths {
        match describe(&classifier, path) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(CliError::Classify(failures));
    }
    Ok(())
}

fn describe(classifier: &dyn ContentClassifier, path: &Path) -> Result<String, ClassifierError> {
    let category = classifier.classify(path)?;
    let verdict = if is_eligible_category(&category) {
        "render-eligible"
    } else {
        "pass-through"
    };
    Ok(format!("{}: {} ({})", path.display(), category, verdict))
}
