//! Binary encoding and decoding of the container object table.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! signature (8) | version (1) | object count (u32)
//! per object, in path order:
//!   path: u16 length + UTF-8 bytes
//!   kind: u8 (0 = group, 1 = dataset)
//!   attribute count: u16, then per attribute:
//!     name: u16 + bytes, tag: u8, payload (tag-dependent)
//!   datasets additionally:
//!     element type: u8 | rank: u8 | dims: rank x u64
//!     values: element count x element size
//!     scale link count: u16, then per link:
//!       axis: u32 | scale path: u16 + bytes | label: u8 flag (+ u16 + bytes)
//! ```

use byteorder::{ByteOrder, LittleEndian};

use crate::error::FormatError;
use crate::signature::{self, FORMAT_VERSION, SIGNATURE};
use crate::store::{
    AttrValue, Container, Dataset, ElementType, Group, Object, ScaleLink, Values, MAX_RANK,
};

const KIND_GROUP: u8 = 0;
const KIND_DATASET: u8 = 1;

const ELEM_F64: u8 = 1;
const ELEM_I32: u8 = 2;

const ATTR_F64: u8 = 1;
const ATTR_I64: u8 = 2;
const ATTR_STRING: u8 = 3;
const ATTR_F64_ARRAY: u8 = 4;
const ATTR_I64_ARRAY: u8 = 5;
const ATTR_STRING_ARRAY: u8 = 6;

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Bounds-checked forward reader over the raw file bytes.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if self.pos + n > self.data.len() {
            return Err(FormatError::UnexpectedEof {
                expected: self.pos + n,
                available: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, FormatError> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    fn u32(&mut self) -> Result<u32, FormatError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    fn u64(&mut self) -> Result<u64, FormatError> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    fn i64(&mut self) -> Result<i64, FormatError> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    fn f64(&mut self) -> Result<f64, FormatError> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    fn i32(&mut self) -> Result<i32, FormatError> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    fn short_string(&mut self) -> Result<String, FormatError> {
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FormatError::InvalidUtf8)
    }

    fn long_string(&mut self) -> Result<String, FormatError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FormatError::InvalidUtf8)
    }
}

/// Decode a full container from file bytes.
pub(crate) fn decode(data: &[u8]) -> Result<Container, FormatError> {
    let start = signature::check_signature(data)?;
    let mut cur = Cursor::new(data, start);

    let count = cur.u32()? as usize;
    let mut container = Container::new();

    for _ in 0..count {
        let path = cur.short_string()?;
        let kind = cur.u8()?;
        let attrs = decode_attrs(&mut cur)?;

        match kind {
            KIND_GROUP => {
                container.put_group(&path);
                if let Some(obj) = container.object_mut(&path) {
                    *obj.attrs_mut() = attrs;
                }
            }
            KIND_DATASET => {
                let mut ds = decode_dataset(&mut cur)?;
                ds.attrs = attrs;
                container.put_dataset(&path, ds);
            }
            k => return Err(FormatError::InvalidObjectKind(k)),
        }
    }

    Ok(container)
}

fn decode_attrs(
    cur: &mut Cursor<'_>,
) -> Result<std::collections::BTreeMap<String, AttrValue>, FormatError> {
    let count = cur.u16()? as usize;
    let mut attrs = std::collections::BTreeMap::new();
    for _ in 0..count {
        let name = cur.short_string()?;
        let tag = cur.u8()?;
        let value = match tag {
            ATTR_F64 => AttrValue::F64(cur.f64()?),
            ATTR_I64 => AttrValue::I64(cur.i64()?),
            ATTR_STRING => AttrValue::String(cur.long_string()?),
            ATTR_F64_ARRAY => {
                let n = cur.u32()? as usize;
                let mut vals = Vec::with_capacity(n);
                for _ in 0..n {
                    vals.push(cur.f64()?);
                }
                AttrValue::F64Array(vals)
            }
            ATTR_I64_ARRAY => {
                let n = cur.u32()? as usize;
                let mut vals = Vec::with_capacity(n);
                for _ in 0..n {
                    vals.push(cur.i64()?);
                }
                AttrValue::I64Array(vals)
            }
            ATTR_STRING_ARRAY => {
                let n = cur.u32()? as usize;
                let mut vals = Vec::with_capacity(n);
                for _ in 0..n {
                    vals.push(cur.long_string()?);
                }
                AttrValue::StringArray(vals)
            }
            t => return Err(FormatError::InvalidAttrType(t)),
        };
        attrs.insert(name, value);
    }
    Ok(attrs)
}

fn decode_dataset(cur: &mut Cursor<'_>) -> Result<Dataset, FormatError> {
    let elem = match cur.u8()? {
        ELEM_F64 => ElementType::F64,
        ELEM_I32 => ElementType::I32,
        t => return Err(FormatError::InvalidElementType(t)),
    };
    let rank = cur.u8()? as usize;
    if rank > MAX_RANK {
        return Err(FormatError::RankTooLarge(rank));
    }
    let mut dims = Vec::with_capacity(rank);
    for _ in 0..rank {
        dims.push(cur.u64()?);
    }
    let count: usize = dims.iter().map(|&d| d as usize).product();

    let values = match elem {
        ElementType::F64 => {
            let mut vals = Vec::with_capacity(count);
            for _ in 0..count {
                vals.push(cur.f64()?);
            }
            Values::F64(vals)
        }
        ElementType::I32 => {
            let mut vals = Vec::with_capacity(count);
            for _ in 0..count {
                vals.push(cur.i32()?);
            }
            Values::I32(vals)
        }
    };

    let scale_count = cur.u16()? as usize;
    let mut scales = Vec::with_capacity(scale_count);
    for _ in 0..scale_count {
        let axis = cur.u32()?;
        let scale = cur.short_string()?;
        let label = match cur.u8()? {
            0 => None,
            _ => Some(cur.short_string()?),
        };
        scales.push(ScaleLink { axis, scale, label });
    }

    let mut ds = Dataset::new(dims, values)?;
    ds.scales = scales;
    Ok(ds)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a full container to file bytes.
pub(crate) fn encode(container: &Container) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::new();
    out.extend_from_slice(&SIGNATURE);
    out.push(FORMAT_VERSION);
    put_u32(&mut out, container.len() as u32);

    for (path, object) in container.iter() {
        put_short_string(&mut out, path);
        match object {
            Object::Group(g) => {
                out.push(KIND_GROUP);
                encode_attrs(&mut out, g);
            }
            Object::Dataset(d) => {
                out.push(KIND_DATASET);
                encode_dataset_attrs(&mut out, d);
                encode_dataset(&mut out, d)?;
            }
        }
    }

    Ok(out)
}

fn encode_attrs(out: &mut Vec<u8>, group: &Group) {
    put_u16(out, group.attrs.len() as u16);
    for (name, value) in &group.attrs {
        put_short_string(out, name);
        encode_attr_value(out, value);
    }
}

fn encode_dataset_attrs(out: &mut Vec<u8>, dataset: &Dataset) {
    put_u16(out, dataset.attrs.len() as u16);
    for (name, value) in &dataset.attrs {
        put_short_string(out, name);
        encode_attr_value(out, value);
    }
}

fn encode_attr_value(out: &mut Vec<u8>, value: &AttrValue) {
    match value {
        AttrValue::F64(v) => {
            out.push(ATTR_F64);
            out.extend_from_slice(&v.to_le_bytes());
        }
        AttrValue::I64(v) => {
            out.push(ATTR_I64);
            out.extend_from_slice(&v.to_le_bytes());
        }
        AttrValue::String(s) => {
            out.push(ATTR_STRING);
            put_long_string(out, s);
        }
        AttrValue::F64Array(vals) => {
            out.push(ATTR_F64_ARRAY);
            put_u32(out, vals.len() as u32);
            for v in vals {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        AttrValue::I64Array(vals) => {
            out.push(ATTR_I64_ARRAY);
            put_u32(out, vals.len() as u32);
            for v in vals {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        AttrValue::StringArray(vals) => {
            out.push(ATTR_STRING_ARRAY);
            put_u32(out, vals.len() as u32);
            for s in vals {
                put_long_string(out, s);
            }
        }
    }
}

fn encode_dataset(out: &mut Vec<u8>, dataset: &Dataset) -> Result<(), FormatError> {
    if dataset.rank() > MAX_RANK {
        return Err(FormatError::RankTooLarge(dataset.rank()));
    }
    match &dataset.values {
        Values::F64(_) => out.push(ELEM_F64),
        Values::I32(_) => out.push(ELEM_I32),
    }
    out.push(dataset.rank() as u8);
    for &d in &dataset.dims {
        out.extend_from_slice(&d.to_le_bytes());
    }
    match &dataset.values {
        Values::F64(vals) => {
            for v in vals {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        Values::I32(vals) => {
            for v in vals {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
    put_u16(out, dataset.scales.len() as u16);
    for link in &dataset.scales {
        put_u32(out, link.axis);
        put_short_string(out, &link.scale);
        match &link.label {
            Some(label) => {
                out.push(1);
                put_short_string(out, label);
            }
            None => out.push(0),
        }
    }
    Ok(())
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_short_string(out: &mut Vec<u8>, s: &str) {
    put_u16(out, s.len() as u16);
    out.extend_from_slice(s.as_bytes());
}

fn put_long_string(out: &mut Vec<u8>, s: &str) {
    put_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}
