// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packets stored one per file

use crate::io::PacketSource;
use std::io;
use std::path::PathBuf;
use std::vec::IntoIter;
use tracing::trace;

/// A [`PacketSource`] yielding the whole content of each file as one packet.
///
/// Files are read lazily, in the order given.
#[derive(Debug)]
pub struct FileSource {
    paths: IntoIter<PathBuf>,
}

impl FileSource {
    #[must_use]
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        FileSource {
            paths: paths
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

impl PacketSource for FileSource {
    fn recv(&mut self) -> io::Result<Option<Vec<u8>>> {
        let Some(path) = self.paths.next() else {
            return Ok(None);
        };
        let packet = std::fs::read(&path).map_err(|e| {
            io::Error::new(e.kind(), format!("failed to read {}: {e}", path.display()))
        })?;
        trace!("read {} bytes from {}", packet.len(), path.display());
        Ok(Some(packet))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::Path;

    fn scratch_file(name: &str, content: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn each_file_is_one_packet() {
        let first = scratch_file("file-source-first", &[0x45, 0, 0, 20]);
        let second = scratch_file("file-source-second", &[]);
        let mut source = FileSource::new([first.clone(), second.clone()]);
        assert_eq!(source.recv().unwrap(), Some(vec![0x45, 0, 0, 20]));
        assert_eq!(source.recv().unwrap(), Some(vec![]));
        assert_eq!(source.recv().unwrap(), None);
        std::fs::remove_file(first).unwrap();
        std::fs::remove_file(second).unwrap();
    }

    #[test]
    fn missing_file_names_the_path() {
        let mut source = FileSource::new([Path::new("/nonexistent/overpass/packet.bin")]);
        let err = source.recv().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/nonexistent/overpass/packet.bin"));
    }
}
