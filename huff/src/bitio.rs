use std::io::{self, Read, Write};

/// Packs bits into bytes, most significant bit first.
pub struct BitWriter<W: Write> {
    writer: W,
    buffer: u8,
    length: u8,
    bits_written: u64,
}

/// Reads bits out of a byte stream, most significant bit first. Bytes are
/// pulled from the underlying reader one at a time, only when needed.
pub struct BitReader<R: Read> {
    reader: R,
    buffer: u8,
    length: u8,
}

impl<W: Write> Write for BitWriter<W> {
    /// Writes whole bytes straight through. Only valid on a byte boundary.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.length != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "byte write in the middle of a partial byte",
            ));
        }
        self.writer.write(buf)
    }

    /// Pads and writes out any partial byte, then flushes the underlying writer.
    fn flush(&mut self) -> io::Result<()> {
        self.flush_bits()?;
        self.writer.flush()
    }
}

impl<W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: 0,
            length: 0,
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.buffer |= 1 << (7 - self.length);
        }
        self.length += 1;
        self.bits_written += 1;

        if self.length == 8 {
            self.writer.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.length = 0;
        }

        Ok(())
    }

    /// Writes the low `length` bits of `bits`, highest of them first.
    pub fn write_bits(&mut self, bits: u128, length: u8) -> io::Result<()> {
        assert!(length <= 128);

        for i in (0..length).rev() {
            self.write_bit((bits >> i) & 1 == 1)?;
        }

        Ok(())
    }

    /// Writes out the partially filled byte, if any, with its low bits zeroed.
    pub fn flush_bits(&mut self) -> io::Result<()> {
        if self.length > 0 {
            self.writer.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.length = 0;
        }

        Ok(())
    }

    /// Bits passed to `write_bit` so far, padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

impl<R: Read> BitReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: 0,
            length: 0,
        }
    }

    /// Returns the next bit, or `None` once the reader is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.length == 0 {
            let mut byte = [0];
            loop {
                match self.reader.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => break,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }

            self.buffer = byte[0];
            self.length = 8;
        }

        self.length -= 1;

        Ok(Some((self.buffer >> self.length) & 1 == 1))
    }
}
