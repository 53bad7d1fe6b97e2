//! Status lines printed on stdout for each stage, and the CI hand-off of the URL.

use std::{
    fmt::Display,
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
};

/// `<label>:<value>`, one per completed stage.
pub fn status_line(label: impl Display, value: &str) -> String {
    format!("{}:{}", label, value)
}

/// Workflow command announcing the published URL to the CI runner.
pub fn ci_output_line(url: &str) -> String {
    format!("::set-output name=download_url::{}", url)
}

/// Appends `download_url=<url>` to a GitHub Actions output file.
pub fn append_github_output(path: &Path, url: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "download_url={}", url)
}

pub fn print_status(label: impl Display, value: &str) {
    println!("{}", status_line(label, value));
}

/// Prints the CI line and, when `GITHUB_OUTPUT` is set, records the URL there too.
pub fn announce_download_url(url: &str) -> io::Result<()> {
    println!("{}", ci_output_line(url));
    if let Some(path) = std::env::var_os("GITHUB_OUTPUT") {
        append_github_output(Path::new(&path), url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        assert_eq!(
            status_line("p_file_path", "tmp/paratranz.zip"),
            "p_file_path:tmp/paratranz.zip"
        );
    }

    #[test]
    fn test_ci_output_line() {
        assert_eq!(
            ci_output_line("https://cdn.example/x"),
            "::set-output name=download_url::https://cdn.example/x"
        );
    }
}
