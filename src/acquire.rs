//! Input acquisition.
//!
//! Reads alignment text from a file or stdin, gunzipping it transparently
//! when it is gzip-compressed. The result is either the whole text or an
//! error; partial input is never handed on.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use flate2::read::MultiGzDecoder;
use log::debug;
use thiserror::Error;

/// gzip member magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors that can occur while acquiring input text.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to decompress gzip input: {0}")]
    Gzip(#[source] io::Error),

    #[error("Input is not valid UTF-8 text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Input reader stopped before producing a result")]
    WorkerLost,
}

/// Result type for acquisition.
pub type DecodeResult<T> = Result<T, DecodeError>;

fn has_gz_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Decodes raw input bytes, decompressing gzip content first.
pub fn decode_bytes(bytes: Vec<u8>) -> DecodeResult<String> {
    decode(bytes, false)
}

fn decode(bytes: Vec<u8>, gz_hint: bool) -> DecodeResult<String> {
    let raw = if bytes.starts_with(&GZIP_MAGIC) || gz_hint {
        let mut out = Vec::with_capacity(bytes.len() * 4);
        MultiGzDecoder::new(bytes.as_slice())
            .read_to_end(&mut out)
            .map_err(DecodeError::Gzip)?;
        debug!("Decompressed {} gzip bytes to {}", bytes.len(), out.len());
        out
    } else {
        bytes
    };
    Ok(String::from_utf8(raw)?)
}

/// Reads the text at `path`; `-` means stdin.
pub fn read_text(path: &Path) -> DecodeResult<String> {
    let mut bytes = Vec::new();
    if path.as_os_str() == "-" {
        io::stdin().lock().read_to_end(&mut bytes)?;
    } else {
        File::open(path)?.read_to_end(&mut bytes)?;
    }
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    decode(bytes, has_gz_extension(path))
}

/// A read running on a worker thread.
///
/// Dropping it abandons the read; its result is discarded.
#[derive(Debug)]
pub struct PendingText {
    rx: Receiver<DecodeResult<String>>,
}

impl PendingText {
    /// Returns the result once the read has finished.
    pub fn try_take(&self) -> Option<DecodeResult<String>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(DecodeError::WorkerLost)),
        }
    }

    /// Blocks until the read has finished.
    pub fn wait(self) -> DecodeResult<String> {
        self.rx.recv().unwrap_or(Err(DecodeError::WorkerLost))
    }
}

/// Starts reading `path` in the background.
pub fn spawn(path: PathBuf) -> PendingText {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver may be gone if the read was abandoned
        let _ = tx.send(read_text(&path));
    });
    PendingText { rx }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::NamedTempFile;

    use super::*;

    const FASTA: &str = ">s1\nAC-GT\n>s2\nACGGT\n";

    fn gzip(text: &str) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(text.as_bytes()).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn test_plain_bytes() {
        assert_eq!(decode_bytes(FASTA.as_bytes().to_vec()).unwrap(), FASTA);
    }

    #[test]
    fn test_gzip_bytes() {
        assert_eq!(decode_bytes(gzip(FASTA)).unwrap(), FASTA);
    }

    #[test]
    fn test_concatenated_gzip_members() {
        let mut bytes = gzip(">s1\nAC\n");
        bytes.extend(gzip(">s2\nGT\n"));
        assert_eq!(decode_bytes(bytes).unwrap(), ">s1\nAC\n>s2\nGT\n");
    }

    #[test]
    fn test_invalid_utf8() {
        let err = decode_bytes(vec![b'>', 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, DecodeError::Utf8(_)));
    }

    #[test]
    fn test_corrupt_gzip() {
        let mut bytes = gzip(FASTA);
        // Break the CRC32 in the member trailer
        let crc = bytes.len() - 8;
        bytes[crc] ^= 0xff;
        let err = decode_bytes(bytes).unwrap_err();
        assert!(matches!(err, DecodeError::Gzip(_)));
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FASTA.as_bytes()).unwrap();
        assert_eq!(read_text(file.path()).unwrap(), FASTA);
    }

    #[test]
    fn test_read_gz_file() {
        let mut file = tempfile::Builder::new().suffix(".fasta.gz").tempfile().unwrap();
        file.write_all(&gzip(FASTA)).unwrap();
        assert_eq!(read_text(file.path()).unwrap(), FASTA);
    }

    #[test]
    fn test_missing_file() {
        let err = read_text(Path::new("/nonexistent/alignment.fasta")).unwrap_err();
        assert!(matches!(err, DecodeError::Io(_)));
    }

    #[test]
    fn test_background_read() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FASTA.as_bytes()).unwrap();
        let pending = spawn(file.path().to_path_buf());
        assert_eq!(pending.wait().unwrap(), FASTA);
    }
}
