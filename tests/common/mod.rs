//! Synthetic fixtures shared by the integration tests and benches.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lzma_rust2::{LzmaOptions, LzmaWriter};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
pub const PNG_IEND: [u8; 12] = [
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

fn png_chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&[0u8; 4]);
    out
}

pub fn png() -> Vec<u8> {
    png_with_idat(&[0x78, 0x9C, 0x63, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01])
}

pub fn png_with_idat(idat: &[u8]) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&[8, 0, 0, 0, 0]);
    data.extend(png_chunk(b"IHDR", &ihdr));
    data.extend(png_chunk(b"tEXt", b"Comment\0synthetic"));
    data.extend(png_chunk(b"IDAT", idat));
    data.extend_from_slice(&PNG_IEND);
    data
}

fn jpeg_segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, marker];
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn jpeg() -> Vec<u8> {
    jpeg_with_scan(&[0x12, 0x34, 0xFF, 0x00, 0x56])
}

/// SOI, APP0, DQT, SOF0, DRI, SOS, `scan`, a restart marker, more scan data, EOI.
pub fn jpeg_with_scan(scan: &[u8]) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend(jpeg_segment(0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"));
    data.extend(jpeg_segment(0xDB, &[0x00; 65]));
    data.extend(jpeg_segment(0xC0, &[8, 0, 1, 0, 1, 1, 1, 0x11, 0]));
    data.extend(jpeg_segment(0xDD, &[0x00, 0x01]));
    data.extend(jpeg_segment(0xDA, &[1, 1, 0, 0, 0x3F, 0]));
    data.extend_from_slice(scan);
    data.extend_from_slice(&[0xFF, 0xD0]);
    data.extend_from_slice(scan);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

pub fn gif() -> Vec<u8> {
    let mut data = b"GIF89a".to_vec();
    data.extend_from_slice(&[0x01, 0x00, 0x01, 0x00]);
    data.push(0x80); // global table, 2 entries
    data.extend_from_slice(&[0x00, 0x00]);
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF]);
    // graphic control extension
    data.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]);
    // image descriptor, no local table
    data.push(0x2C);
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00]);
    data.push(0x00);
    data.extend_from_slice(&[0x02, 0x01, 0x44, 0x00]);
    data.push(0x3B);
    data
}

fn swf_header(discriminant: u8, declared: u32) -> Vec<u8> {
    let mut data = vec![discriminant, b'W', b'S', 10];
    data.extend_from_slice(&declared.to_le_bytes());
    data
}

pub fn swf_body() -> Vec<u8> {
    let mut body = vec![0x78, 0x00, 0x05, 0x5F, 0x00, 0x00, 0x0F, 0xA0, 0x00];
    body.extend_from_slice(&[0x00, 0x18, 0x01, 0x00]);
    body.extend((0..200u32).map(|i| (i % 7) as u8));
    body.extend_from_slice(&[0x40, 0x00, 0x00, 0x00]);
    body
}

pub fn swf_uncompressed() -> Vec<u8> {
    let body = swf_body();
    let mut data = swf_header(b'F', (body.len() + 8) as u32);
    data.extend(body);
    data
}

pub fn swf_zlib() -> Vec<u8> {
    swf_zlib_declared((swf_body().len() + 8) as u32)
}

pub fn swf_zlib_declared(declared: u32) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&swf_body()).unwrap();
    let mut data = swf_header(b'C', declared);
    data.extend(encoder.finish().unwrap());
    data
}

pub fn swf_lzma() -> Vec<u8> {
    swf_lzma_declared((swf_body().len() + 8) as u32)
}

/// `.lzma` framing (properties, dictionary size, unknown size) with an end
/// marker, right after the SWF header.
pub fn swf_lzma_declared(declared: u32) -> Vec<u8> {
    let mut stream = Vec::new();
    {
        let mut writer =
            LzmaWriter::new_use_header(&mut stream, &LzmaOptions::with_preset(6), None).unwrap();
        writer.write_all(&swf_body()).unwrap();
        writer.finish().unwrap();
    }
    let mut data = swf_header(b'Z', declared);
    data.extend(stream);
    data
}

/// All valid fixtures with a short name.
pub fn valid_fixtures() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("png", png()),
        ("jpeg", jpeg()),
        ("gif", gif()),
        ("swf-uncompressed", swf_uncompressed()),
        ("swf-zlib", swf_zlib()),
        ("swf-lzma", swf_lzma()),
    ]
}

pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}
