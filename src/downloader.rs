use crate::model::{default_data_dir, DatasetReference};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Fetch a dataset into `destination` (or the default data folder) and return
/// the path of the downloaded file. The destination directory is created if
/// it does not exist yet. Blocks until the transfer is finished.
pub fn download_neural_data(dataset: &DatasetReference, destination: Option<&Path>) -> Result<PathBuf> {
    let destination = match destination {
        Some(dir) => dir.to_path_buf(),
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&destination)
        .with_context(|| format!("creating destination directory {}", destination.display()))?;
    let target = destination.join(dataset.file_name);

    let url = direct_download_url(dataset.url);
    info!("downloading {} from {}", dataset.id, url);

    // No per-request timeout: the widefield file is large and the transfer is
    // expected to block for a while.
    let client = reqwest::blocking::Client::builder()
        .timeout(None::<Duration>)
        .build()
        .context("building http client")?;
    let mut response = client
        .get(&url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("requesting {url}"))?;

    let bar = match response.content_length() {
        Some(total) => ProgressBar::new(total).with_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {decimal_bytes}/{decimal_total_bytes} ({decimal_bytes_per_sec}) ({eta})",
            )
            .unwrap(),
        ),
        None => ProgressBar::new_spinner(),
    };

    // Stream into a temp file in the same directory and persist once the body
    // is complete, so an interrupted transfer never leaves a half-written
    // dataset under the final name.
    let mut tmp = NamedTempFile::new_in(&destination)
        .with_context(|| format!("creating temp file in {}", destination.display()))?;
    let mut hasher = Sha256::new();
    let mut written: u64 = 0;
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = response.read(&mut buf).context("reading response body")?;
        if n == 0 {
            break;
        }
        tmp.write_all(&buf[..n]).context("writing dataset to disk")?;
        hasher.update(&buf[..n]);
        written += n as u64;
        bar.inc(n as u64);
    }
    bar.finish_and_clear();

    tmp.persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("moving download into place at {}", target.display()))?;

    info!(
        "wrote {} ({} bytes, sha256 {})",
        target.display(),
        written,
        hex_digest(&hasher.finalize())
    );
    Ok(target)
}

/// Turn a Google Drive "view" share link into the direct download link the
/// transfer actually needs. Non-Drive URLs pass through unchanged.
pub fn direct_download_url(url: &str) -> String {
    match url.split_once("/file/d/") {
        Some((_, rest)) => {
            let id = rest.split(['/', '?']).next().unwrap_or(rest);
            format!("https://drive.google.com/uc?export=download&id={id}")
        }
        None => url.to_string(),
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn resolves_drive_view_links() {
        assert_eq!(
            direct_download_url(DatasetReference::MINISCOPE.url),
            "https://drive.google.com/uc?export=download&id=1cLbUqh2LKLXuwqXdjyvMi4DuKMFC0DiM"
        );
        assert_eq!(
            direct_download_url(DatasetReference::WIDEFIELD.url),
            "https://drive.google.com/uc?export=download&id=1XNCPKY5bRS9QtvY1aj982CjaCkMgeOJt"
        );
    }

    #[test]
    fn passes_non_drive_urls_through() {
        let url = "https://example.org/files/widefield_data.mat";
        assert_eq!(direct_download_url(url), url);
    }

    #[test]
    fn hex_digest_is_lowercase_hex() {
        assert_eq!(hex_digest(&[0x00, 0xab, 0xff]), "00abff");
    }

    #[test]
    fn downloads_into_created_destination() {
        let body: &[u8] = b"not really a numpy file";
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(header.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });

        let dataset = DatasetReference {
            id: "miniscope",
            url: Box::leak(format!("http://{addr}/miniscope_data.npy").into_boxed_str()),
            file_name: "miniscope_data.npy",
        };
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("nested").join("data");

        let path = download_neural_data(&dataset, Some(&destination)).unwrap();

        assert_eq!(path.file_name().unwrap(), "miniscope_data.npy");
        assert!(destination.is_dir());
        assert_eq!(std::fs::read(&path).unwrap(), body);
    }
}
