//! Render command - one-shot conversion of a single file to PNG.

use std::fs;
use std::path::{Path, PathBuf};

use txt2png::classify::{is_render_eligible, SniffClassifier};
use txt2png::overlay::name;
use txt2png::render::{render_file, AnsiRenderer};

use crate::error::CliError;

/// Run the render command.
pub fn run(input: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output(input)?,
    };
    if same_file(input, &output) {
        return Err(CliError::Config(format!(
            "Refusing to overwrite '{}' with its own rendering; choose another --output",
            input.display()
        )));
    }

    if !is_render_eligible(&SniffClassifier::new(), input) {
        eprintln!(
            "Warning: '{}' would not get a .png twin in the overlay; rendering anyway",
            input.display()
        );
    }

    let buffer = render_file(&AnsiRenderer::new(), input).map_err(|error| CliError::Render {
        path: input.to_path_buf(),
        error,
    })?;

    fs::write(&output, buffer.as_bytes()).map_err(|error| CliError::FileWrite {
        path: output.clone(),
        error,
    })?;

    println!(
        "Rendered {} -> {} ({} bytes)",
        input.display(),
        output.display(),
        buffer.len()
    );
    Ok(())
}

/// The overlay's synthetic name for `input`, placed beside it.
///
/// A `.png` input already carries that name, so it needs an explicit
/// `--output`.
fn default_output(input: &Path) -> Result<PathBuf, CliError> {
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            CliError::Config(format!(
                "Cannot derive an output name from '{}'; use --output",
                input.display()
            ))
        })?;
    let output = input.with_file_name(name::encode(file_name));
    if output == input {
        return Err(CliError::Config(format!(
            "'{}' already has the .png name; use --output to choose where to write",
            input.display()
        )));
    }
    Ok(output)
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
