use std::io::{ErrorKind, Read};
use std::time::Duration;

use reqwest::blocking::Client;
use speechprep_domain::{ArchiveDownload, ArchiveDownloadRequest, ArchiveSource, DomainError};

/// Blocking HTTP(S) source that buffers the whole response body in memory.
pub struct HttpArchiveSource {
    client: Client,
}

impl HttpArchiveSource {
    /// `timeout` of `None` lets a stalled connection block indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DomainError::network("build http client", err))?;
        Ok(Self { client })
    }
}

impl ArchiveSource for HttpArchiveSource {
    fn download(&self, request: &ArchiveDownloadRequest) -> Result<ArchiveDownload, DomainError> {
        let mut response = self
            .client
            .get(&request.url)
            .send()
            .map_err(|err| DomainError::network("send archive request", err))?
            .error_for_status()
            .map_err(|err| DomainError::network("check archive response status", err))?;

        let declared_length = response.content_length();
        tracing::info!(
            url = %request.url,
            declared_length = ?declared_length,
            chunk_size = request.chunk_size,
            "downloading archive"
        );

        let bytes = read_in_chunks(&mut response, request.chunk_size, declared_length)?;

        tracing::info!(
            url = %request.url,
            received = bytes.len(),
            "archive download completed"
        );

        Ok(ArchiveDownload {
            bytes,
            declared_length,
        })
    }
}

pub(crate) fn read_in_chunks<R: Read>(
    reader: &mut R,
    chunk_size: usize,
    declared_length: Option<u64>,
) -> Result<Vec<u8>, DomainError> {
    if chunk_size == 0 {
        return Err(DomainError::invalid_argument("chunk_size must be at least 1"));
    }

    let mut buffer = Vec::new();
    let mut chunk = vec![0_u8; chunk_size];
    let mut chunks = 0_usize;

    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(DomainError::network("read archive body", err)),
        };
        buffer.extend_from_slice(&chunk[..read]);
        chunks += 1;

        tracing::debug!(
            chunk = chunks,
            received = buffer.len(),
            declared_length = ?declared_length,
            "received archive chunk"
        );
    }

    if let Some(expected) = declared_length {
        if (buffer.len() as u64) < expected {
            return Err(DomainError::network(
                "read archive body",
                format!(
                    "stream ended after {} of {expected} declared bytes",
                    buffer.len()
                ),
            ));
        }
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use speechprep_domain::DomainError;

    use super::read_in_chunks;

    #[test]
    fn reads_whole_body_in_small_chunks() {
        let body = (0..=255_u8).collect::<Vec<_>>();

        let bytes = read_in_chunks(&mut Cursor::new(body.clone()), 7, Some(256)).expect("read");

        assert_eq!(bytes, body);
    }

    #[test]
    fn reads_body_without_declared_length() {
        let bytes = read_in_chunks(&mut Cursor::new(b"abcdef".to_vec()), 4, None).expect("read");

        assert_eq!(bytes, b"abcdef");
    }

    #[test]
    fn short_body_is_reported_as_truncated() {
        let err = read_in_chunks(&mut Cursor::new(vec![1_u8; 10]), 4, Some(20))
            .expect_err("must fail");

        assert!(matches!(err, DomainError::Network { .. }));
        assert!(err.to_string().contains("10 of 20"));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = read_in_chunks(&mut Cursor::new(Vec::new()), 0, None).expect_err("must fail");

        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }
}
