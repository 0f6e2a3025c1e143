//! Streaming UTF-8 decoding of PTY output into text frames.

/// Turns arbitrary byte chunks into strings without splitting characters.
///
/// A multi-byte sequence cut at a chunk boundary is held back and completed
/// by the next chunk. Valid input comes out byte-for-byte; invalid bytes
/// become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::with_capacity(self.pending.len());
        let mut start = 0;

        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    start = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    out.push_str(std::str::from_utf8(&self.pending[start..valid_end]).unwrap_or(""));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + bad;
                        }
                        None => {
                            // Incomplete sequence at the end: keep it.
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..start);
        out
    }

    /// Bytes held back waiting for the rest of a character.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut d = Utf8Decoder::default();
        assert_eq!(d.decode(b"\x1b[31mred\x1b[0m\r\n"), "\x1b[31mred\x1b[0m\r\n");
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn split_character_is_joined() {
        let bytes = "héllo".as_bytes();
        // 'é' is two bytes starting at index 1.
        let mut d = Utf8Decoder::default();
        assert_eq!(d.decode(&bytes[..2]), "h");
        assert_eq!(d.pending(), 1);
        assert_eq!(d.decode(&bytes[2..]), "éllo");
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn four_byte_character_across_three_chunks() {
        let bytes = "a🦀b".as_bytes();
        let mut d = Utf8Decoder::default();
        let mut out = String::new();
        out.push_str(&d.decode(&bytes[..2]));
        out.push_str(&d.decode(&bytes[2..4]));
        out.push_str(&d.decode(&bytes[4..]));
        assert_eq!(out, "a🦀b");
    }

    #[test]
    fn invalid_bytes_become_replacement() {
        let mut d = Utf8Decoder::default();
        assert_eq!(d.decode(b"ok\xffok"), "ok\u{FFFD}ok");
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn empty_chunk_yields_nothing() {
        let mut d = Utf8Decoder::default();
        assert_eq!(d.decode(b""), "");
    }
}
