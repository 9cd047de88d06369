#![allow(dead_code)]

use sectional::check::compute_crc;

/// Assembles bit-packed test inputs, most significant bit first.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bits: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bits(&mut self, n: usize, value: u32) -> &mut Self {
        for i in (0..n).rev() {
            self.push_bit((value >> i) & 1 != 0);
        }
        self
    }

    pub fn bytes(&mut self, r: &[u8]) -> &mut Self {
        for &b in r {
            self.bits(8, b.into());
        }
        self
    }

    pub fn text(&mut self, r: &[u8]) -> &mut Self {
        self.bits(8, r.len() as u32).bytes(r)
    }

    pub fn finish(&self) -> Vec<u8> {
        assert_eq!(self.bits % 8, 0, "writer is not byte-aligned");
        self.bytes.clone()
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bits % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            *self.bytes.last_mut().unwrap() |= 0x80 >> (self.bits % 8);
        }
        self.bits += 1;
    }
}

/// Build a long-form section around a payload, with a valid checksum.
pub fn section(table_id: u8, table_id_extension: u16, version: u8, payload: &[u8]) -> Vec<u8> {
    let section_length = 5 + payload.len() + 4;

    let mut bytes = BitWriter::new()
        .bits(8, table_id.into())
        .bits(1, 1)
        .bits(1, 1)
        .bits(2, 0b11)
        .bits(12, section_length as u32)
        .bits(16, table_id_extension.into())
        .bits(2, 0b11)
        .bits(5, version.into())
        .bits(1, 1)
        .bits(8, 0)
        .bits(8, 0)
        .bytes(payload)
        .finish();

    let crc = compute_crc(&bytes);
    bytes.extend_from_slice(&crc.to_be_bytes());
    bytes
}

/// Frame a descriptor payload with its tag and length.
pub fn descriptor(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![tag, payload.len() as u8];
    bytes.extend_from_slice(payload);
    bytes
}
