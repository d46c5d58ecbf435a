//! Streaming multi-algorithm hash computation
//!
//! One sequential read of the source produces digests for every requested
//! algorithm, bounding I/O cost to the file size regardless of how many
//! algorithms are enabled. Unreadable sources are a normal outcome (remote
//! storage back-ends go away), so every failure here resolves to missing
//! digests rather than an error.

use crate::algorithm::{Algorithm, DigestState, Mechanism};
use crate::store::FileSource;
use log::debug;
use std::collections::HashMap;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read granularity for the streaming path.
pub const CHUNK_SIZE: usize = 8192;

/// Requested algorithm to digest, `None` for any algorithm that did not
/// complete. Never contains empty strings.
pub type DigestMap = HashMap<Algorithm, Option<String>>;

/// Multi-algorithm streaming hasher.
#[derive(Debug, Clone)]
pub struct MultiHasher {
    chunk_size: usize,
}

impl MultiHasher {
    /// Create a hasher with the default chunk size.
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Create a hasher with a custom chunk size (tests use tiny chunks to
    /// exercise boundary handling).
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Compute digests for a file location.
    ///
    /// An unopenable location resolves every requested algorithm to `None`.
    /// A single checksum-mechanism algorithm takes the whole-file fast path;
    /// it is behaviorally identical to the chunked path.
    pub async fn hash_source(
        &self,
        source: &dyn FileSource,
        uri: &Path,
        algorithms: &[Algorithm],
    ) -> DigestMap {
        if algorithms.is_empty() {
            return DigestMap::new();
        }

        if let [algo] = algorithms
            && algo.mechanism() == Mechanism::Checksum
        {
            let digest = match source.read_all(uri).await {
                Ok(data) => algo.digest_bytes(&data),
                Err(err) => {
                    debug!("cannot read {}: {err}", uri.display());
                    None
                }
            };
            return DigestMap::from([(*algo, digest)]);
        }

        match source.open(uri).await {
            Ok(reader) => self.hash_stream(reader, algorithms).await,
            Err(err) => {
                debug!("cannot open {}: {err}", uri.display());
                algorithms.iter().map(|&algo| (algo, None)).collect()
            }
        }
    }

    /// Compute digests from an already-open byte stream.
    ///
    /// The stream is owned for the duration of the call and released on
    /// every exit path. A read error aborts the whole pass: every requested
    /// algorithm resolves to `None`, partial digests are never exposed.
    pub async fn hash_stream<R>(&self, mut reader: R, algorithms: &[Algorithm]) -> DigestMap
    where
        R: AsyncRead + Unpin,
    {
        if algorithms.is_empty() {
            return DigestMap::new();
        }

        let mut results: DigestMap = algorithms.iter().map(|&algo| (algo, None)).collect();

        // One incremental state per algorithm. An algorithm whose back-end
        // is unavailable stays in the result map as None.
        let requested: Vec<Algorithm> = results.keys().copied().collect();
        let mut states: Vec<(Algorithm, DigestState)> = Vec::with_capacity(requested.len());
        for algo in requested {
            if let Some(state) = algo.init() {
                states.push((algo, state));
            } else {
                debug!("hash back-end unavailable for {algo}");
            }
        }

        let mut buffer = vec![0u8; self.chunk_size];
        loop {
            match reader.read(&mut buffer).await {
                Ok(0) => break,
                Ok(n) => {
                    for (_, state) in &mut states {
                        state.update(&buffer[..n]);
                    }
                }
                Err(err) => {
                    debug!("aborting hash pass on read error: {err}");
                    return results;
                }
            }
        }

        for (algo, state) in states {
            results.insert(algo, state.finalize());
        }
        results
    }

    /// Compute digests for an in-memory buffer.
    pub fn hash_bytes(&self, data: &[u8], algorithms: &[Algorithm]) -> DigestMap {
        algorithms
            .iter()
            .map(|&algo| (algo, algo.digest_bytes(data)))
            .collect()
    }
}

impl Default for MultiHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalFileSource;
    use proptest::prelude::*;
    use tempfile::TempDir;

    const SHA1_EMPTY: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
    const SHA1_HELLO_WORLD: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_single_pass_matches_single_algorithm() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "hello.txt", b"hello world");
        let hasher = MultiHasher::new();
        let source = LocalFileSource;

        let combined = hasher
            .hash_source(
                &source,
                &path,
                &[Algorithm::Sha1, Algorithm::Md5, Algorithm::Sha256],
            )
            .await;

        // SHA-1 is unaffected by the other algorithms in the request.
        assert_eq!(
            combined[&Algorithm::Sha1].as_deref(),
            Some(SHA1_HELLO_WORLD)
        );

        for algo in [Algorithm::Sha1, Algorithm::Md5, Algorithm::Sha256] {
            let alone = hasher.hash_source(&source, &path, &[algo]).await;
            assert_eq!(alone[&algo], combined[&algo], "{algo}");
        }
    }

    #[tokio::test]
    async fn test_empty_stream_yields_empty_input_digests() {
        let hasher = MultiHasher::new();
        let results = hasher
            .hash_stream(tokio::io::empty(), &[Algorithm::Sha1, Algorithm::Md5])
            .await;

        assert_eq!(results[&Algorithm::Sha1].as_deref(), Some(SHA1_EMPTY));
        assert_eq!(
            results[&Algorithm::Md5].as_deref(),
            Some("d41d8cd98f00b204e9800998ecf8427e")
        );
    }

    #[tokio::test]
    async fn test_empty_algorithm_set_does_no_io() {
        let hasher = MultiHasher::new();
        let source = LocalFileSource;

        // The location does not exist; with no algorithms requested the
        // call returns before touching it.
        let results = hasher
            .hash_source(&source, Path::new("/no/such/file"), &[])
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_source_yields_all_null() {
        let hasher = MultiHasher::new();
        let source = LocalFileSource;
        let requested = [Algorithm::Sha1, Algorithm::Sha256, Algorithm::Blake2b256];

        let results = hasher
            .hash_source(&source, Path::new("/no/such/file"), &requested)
            .await;

        assert_eq!(results.len(), requested.len());
        for algo in requested {
            assert_eq!(results[&algo], None, "{algo}");
        }
    }

    #[tokio::test]
    async fn test_unreadable_source_fast_path_yields_null() {
        let hasher = MultiHasher::new();
        let source = LocalFileSource;

        let results = hasher
            .hash_source(&source, Path::new("/no/such/file"), &[Algorithm::Sha1])
            .await;
        assert_eq!(results[&Algorithm::Sha1], None);
    }

    #[tokio::test]
    async fn test_fast_path_equals_general_path() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.bin", &[0x42u8; 100_000]);
        let hasher = MultiHasher::new();
        let source = LocalFileSource;

        // Single checksum request takes the whole-file read; forcing the
        // chunked path through an open stream must agree with it.
        let fast = hasher.hash_source(&source, &path, &[Algorithm::Sha256]).await;
        let reader = source.open(&path).await.unwrap();
        let general = hasher.hash_stream(reader, &[Algorithm::Sha256]).await;

        assert_eq!(fast[&Algorithm::Sha256], general[&Algorithm::Sha256]);
        assert!(fast[&Algorithm::Sha256].is_some());
    }

    #[tokio::test]
    async fn test_chunk_boundaries_do_not_change_digests() {
        let content: Vec<u8> = (0u32..40_000).map(|i| (i % 251) as u8).collect();
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "boundaries.bin", &content);
        let source = LocalFileSource;

        let baseline = MultiHasher::new()
            .hash_source(&source, &path, &[Algorithm::Sha512, Algorithm::Blake2b512])
            .await;

        for chunk_size in [1, 7, 8192, 65536] {
            let hasher = MultiHasher::with_chunk_size(chunk_size);
            let reader = source.open(&path).await.unwrap();
            let results = hasher
                .hash_stream(reader, &[Algorithm::Sha512, Algorithm::Blake2b512])
                .await;
            assert_eq!(results, baseline, "chunk size {chunk_size}");
        }
    }

    #[tokio::test]
    async fn test_duplicate_requests_collapse() {
        let hasher = MultiHasher::new();
        let results = hasher
            .hash_stream(
                tokio::io::empty(),
                &[Algorithm::Sha1, Algorithm::Sha1, Algorithm::Md5],
            )
            .await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[&Algorithm::Sha1].as_deref(), Some(SHA1_EMPTY));
    }

    #[test]
    fn test_hash_bytes_lengths_and_case() {
        let hasher = MultiHasher::new();
        let results = hasher.hash_bytes(b"mixed case check", &Algorithm::ALL);

        for (algo, digest) in results {
            let Some(digest) = digest else {
                assert_eq!(algo.mechanism(), Mechanism::KeyedHash);
                continue;
            };
            assert_eq!(digest.len(), algo.hex_len(), "{algo}");
            assert_eq!(digest, digest.to_lowercase(), "{algo}");
            assert!(!digest.is_empty());
        }
    }

    proptest! {
        #[test]
        fn test_multi_hash_matches_one_shot(data: Vec<u8>) {
            let hasher = MultiHasher::new();
            let requested = [Algorithm::Sha1, Algorithm::Sha256, Algorithm::Blake2b256];
            let results = hasher.hash_bytes(&data, &requested);

            for algo in requested {
                prop_assert_eq!(&results[&algo], &algo.digest_bytes(&data));
            }
        }

        #[test]
        fn test_streaming_matches_bytes(data: Vec<u8>, chunk in 1usize..4096) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let hasher = MultiHasher::with_chunk_size(chunk);
            let requested = [Algorithm::Md5, Algorithm::Sha512256];

            let streamed = rt.block_on(hasher.hash_stream(data.as_slice(), &requested));
            let direct = hasher.hash_bytes(&data, &requested);
            prop_assert_eq!(streamed, direct);
        }
    }
}
