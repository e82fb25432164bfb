use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{anyhow, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use ndarray::Array2;

/// The magic prefix of every NumPy `.npy` file
const NPY_MAGIC: &[u8] = b"\x93NUMPY";

/// Write a v1.0 header: magic, version, little-endian header length,
/// then the Python dict padded with spaces so the data section starts
/// on a 64-byte boundary, ending in a newline.
fn write_header<W: Write>(out: &mut W, descr: &str, shape: &str) -> io::Result<()> {
    let mut dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        descr, shape
    );
    let unpadded = NPY_MAGIC.len() + 4 + dict.len() + 1;
    let padding = (64 - unpadded % 64) % 64;
    dict.push_str(&" ".repeat(padding));
    dict.push('\n');

    out.write_all(NPY_MAGIC)?;
    out.write_all(&[0x01, 0x00])?; // version 1.0
    out.write_u16::<LittleEndian>(dict.len() as u16)?;
    out.write_all(dict.as_bytes())?;
    Ok(())
}

/// Save a 2-D float matrix as `<f8` in C order.
pub fn write_f64_matrix<P: AsRef<Path>>(path: P, data: &Array2<f64>) -> Result<()> {
    let (rows, cols) = data.dim();
    let mut out = BufWriter::new(File::create(path)?);
    write_header(&mut out, "<f8", &format!("({}, {})", rows, cols))?;
    for value in data.iter() {
        out.write_f64::<LittleEndian>(*value)?;
    }
    out.flush()?;
    Ok(())
}

/// Save a string vector as a fixed-width unicode array (`<U{n}`, cells
/// stored as zero-padded UTF-32LE code points).
pub fn write_str_vector<P: AsRef<Path>>(path: P, values: &[&str]) -> Result<()> {
    let width = values
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(1)
        .max(1);
    let mut out = BufWriter::new(File::create(path)?);
    write_header(&mut out, &format!("<U{}", width), &format!("({},)", values.len()))?;
    for value in values {
        let mut written = 0;
        for ch in value.chars() {
            out.write_u32::<LittleEndian>(ch as u32)?;
            written += 1;
        }
        for _ in written..width {
            out.write_u32::<LittleEndian>(0)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Read a v1.0/v2.0 header, returning the descr string and shape.
fn read_header(file: &mut File) -> Result<(String, Vec<usize>)> {
    let mut magic = [0u8; 6];
    file.read_exact(&mut magic)?;
    if magic != *NPY_MAGIC {
        return Err(anyhow!("not a .npy file"));
    }
    let mut version = [0u8; 2];
    file.read_exact(&mut version)?;
    let header_len = if version[0] >= 2 {
        file.read_u32::<LittleEndian>()? as usize
    } else {
        file.read_u16::<LittleEndian>()? as usize
    };
    let mut header = vec![0u8; header_len];
    file.read_exact(&mut header)?;
    let header = String::from_utf8(header)?;

    let descr = quoted_field(&header, "descr")?;
    let shape = parse_shape(&header)?;
    Ok((descr, shape))
}

/// Extract a single-quoted value for `key` from the header dict.
fn quoted_field(header: &str, key: &str) -> Result<String> {
    let key_pattern = format!("'{}':", key);
    let start = header
        .find(&key_pattern)
        .ok_or_else(|| anyhow!("missing {} in npy header", key))?;
    let rest = &header[start + key_pattern.len()..];
    let open = rest.find('\'').ok_or_else(|| anyhow!("missing quote in npy header"))?;
    let rest = &rest[open + 1..];
    let close = rest.find('\'').ok_or_else(|| anyhow!("missing quote in npy header"))?;
    Ok(rest[..close].to_string())
}

fn parse_shape(header: &str) -> Result<Vec<usize>> {
    let open = header.find('(').ok_or_else(|| anyhow!("missing shape in npy header"))?;
    let close = header[open..]
        .find(')')
        .ok_or_else(|| anyhow!("missing shape in npy header"))?
        + open;
    header[open + 1..close]
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|e| anyhow!("bad dimension {:?}: {}", s, e))
        })
        .collect()
}

/// Load a `<f8` matrix back; used by tests and for spot checks.
pub fn read_f64_matrix<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let mut file = File::open(path)?;
    let (descr, shape) = read_header(&mut file)?;
    if descr != "<f8" {
        return Err(anyhow!("expected <f8 data, found {}", descr));
    }
    if shape.len() != 2 {
        return Err(anyhow!("expected a 2-D array, found shape {:?}", shape));
    }
    let count = shape[0] * shape[1];
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(file.read_f64::<LittleEndian>()?);
    }
    Ok(Array2::from_shape_vec((shape[0], shape[1]), values)?)
}

/// Load a fixed-width unicode vector back, trimming the zero padding.
pub fn read_str_vector<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let mut file = File::open(path)?;
    let (descr, shape) = read_header(&mut file)?;
    let width: usize = descr
        .strip_prefix("<U")
        .ok_or_else(|| anyhow!("expected <U data, found {}", descr))?
        .parse()?;
    if shape.len() != 1 {
        return Err(anyhow!("expected a 1-D array, found shape {:?}", shape));
    }
    let mut values = Vec::with_capacity(shape[0]);
    for _ in 0..shape[0] {
        let mut value = String::new();
        for _ in 0..width {
            let code = file.read_u32::<LittleEndian>()?;
            if code != 0 {
                value.push(char::from_u32(code).ok_or_else(|| anyhow!("invalid code point {}", code))?);
            }
        }
        values.push(value);
    }
    Ok(values)
}
