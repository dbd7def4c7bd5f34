//! Descriptive attributes: well-known names, the padding-tolerant string
//! validator, and the public string-attribute surface.

use std::path::Path;

use rustysdf_format::{AttrValue, Container};

use crate::error::{display_path, Error};

pub(crate) const COMMENT_ATTR: &str = "COMMENT";
pub(crate) const DISPLAY_NAME_ATTR: &str = "NAME";
pub(crate) const UNIT_ATTR: &str = "UNIT";
pub(crate) const DISPLAY_UNIT_ATTR: &str = "DISPLAY_UNIT";
pub(crate) const RELATIVE_QUANTITY_ATTR: &str = "RELATIVE_QUANTITY";

/// The comparable part of a fixed-width stored string: cut at the first NUL,
/// then strip trailing blanks. Producers writing fixed-width attributes pad
/// with either.
pub(crate) fn effective_value(stored: &str) -> &str {
    let cut = match stored.find('\0') {
        Some(i) => &stored[..i],
        None => stored,
    };
    cut.trim_end_matches(' ')
}

/// Compare a stored string attribute against an expected value.
///
/// Distinguishes four failures: the attribute is missing, it is not scalar,
/// it is not a string, or its (padding-stripped) value differs. Lengths are
/// compared before content so the error always reports the full stored value.
pub(crate) fn check_string_attribute(
    container: &Container,
    file: &str,
    object: &str,
    name: &str,
    expected: &str,
) -> Result<(), Error> {
    let Some(obj) = container.object(object) else {
        return Err(Error::ObjectNotFound {
            file: file.to_string(),
            object: object.to_string(),
        });
    };
    let Some(value) = obj.attrs().get(name) else {
        return Err(Error::AttributeMissing {
            object: object.to_string(),
            name: name.to_string(),
        });
    };
    let stored = match value {
        AttrValue::String(s) => s,
        AttrValue::StringArray(_) => {
            return Err(Error::AttributeRank {
                object: object.to_string(),
                name: name.to_string(),
            })
        }
        _ => {
            return Err(Error::AttributeType {
                object: object.to_string(),
                name: name.to_string(),
            })
        }
    };
    let actual = effective_value(stored);
    if actual.len() != expected.len() || actual != expected {
        return Err(Error::AttributeValue {
            object: object.to_string(),
            name: name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

fn string_attr_value<'c>(
    container: &'c Container,
    file: &str,
    object: &str,
    name: &str,
) -> Result<&'c str, Error> {
    let Some(obj) = container.object(object) else {
        return Err(Error::ObjectNotFound {
            file: file.to_string(),
            object: object.to_string(),
        });
    };
    match obj.attrs().get(name) {
        Some(AttrValue::String(s)) => Ok(s),
        Some(_) => Err(Error::AttributeType {
            object: object.to_string(),
            name: name.to_string(),
        }),
        None => Err(Error::AttributeMissing {
            object: object.to_string(),
            name: name.to_string(),
        }),
    }
}

/// Length in bytes of a string attribute's stored value.
pub fn string_attr_len<P: AsRef<Path>>(
    file: P,
    object: &str,
    name: &str,
) -> Result<usize, Error> {
    let file = display_path(file.as_ref());
    let container = Container::open(&file).map_err(|e| Error::format(&file, e))?;
    string_attr_value(&container, &file, object, name).map(|s| s.len())
}

/// Read a string attribute's stored value verbatim, padding included.
pub fn string_attr<P: AsRef<Path>>(file: P, object: &str, name: &str) -> Result<String, Error> {
    let file = display_path(file.as_ref());
    let container = Container::open(&file).map_err(|e| Error::format(&file, e))?;
    string_attr_value(&container, &file, object, name).map(|s| s.to_string())
}

/// Set a string attribute on an existing object in an existing container.
pub fn set_string_attr<P: AsRef<Path>>(
    file: P,
    object: &str,
    name: &str,
    value: &str,
) -> Result<(), Error> {
    let file = display_path(file.as_ref());
    let mut container = Container::open(&file).map_err(|e| Error::format(&file, e))?;
    if !container.set_attr(object, name, AttrValue::String(value.to_string())) {
        return Err(Error::ObjectNotFound {
            file,
            object: object.to_string(),
        });
    }
    container.save(&file).map_err(|e| Error::format(&file, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustysdf_format::{Dataset, Values};

    fn container_with_unit(unit: &str) -> Container {
        let mut c = Container::new();
        let mut ds = Dataset::new(vec![], Values::F64(vec![1.0])).unwrap();
        ds.attrs
            .insert(UNIT_ATTR.into(), AttrValue::String(unit.into()));
        c.put_dataset("/x", ds);
        c
    }

    #[test]
    fn exact_match_passes() {
        let c = container_with_unit("N.m");
        check_string_attribute(&c, "f", "/x", UNIT_ATTR, "N.m").unwrap();
    }

    #[test]
    fn nul_padding_tolerated() {
        let c = container_with_unit("N.m\0\0\0\0\0");
        check_string_attribute(&c, "f", "/x", UNIT_ATTR, "N.m").unwrap();
    }

    #[test]
    fn blank_padding_tolerated() {
        let c = container_with_unit("N.m    ");
        check_string_attribute(&c, "f", "/x", UNIT_ATTR, "N.m").unwrap();
    }

    #[test]
    fn mismatch_names_both_values() {
        let c = container_with_unit("U1");
        let err = check_string_attribute(&c, "f", "/x", UNIT_ATTR, "X1").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'X1'"), "{msg}");
        assert!(msg.contains("'U1'"), "{msg}");
        assert!(msg.contains("/x"), "{msg}");
    }

    #[test]
    fn prefix_is_not_a_match() {
        let c = container_with_unit("N.mm");
        assert!(matches!(
            check_string_attribute(&c, "f", "/x", UNIT_ATTR, "N.m"),
            Err(Error::AttributeValue { .. })
        ));
    }

    #[test]
    fn missing_attribute_reported() {
        let mut c = Container::new();
        c.put_dataset("/x", Dataset::new(vec![], Values::F64(vec![1.0])).unwrap());
        assert!(matches!(
            check_string_attribute(&c, "f", "/x", UNIT_ATTR, "m"),
            Err(Error::AttributeMissing { .. })
        ));
    }

    #[test]
    fn numeric_attribute_is_type_error() {
        let mut c = Container::new();
        let mut ds = Dataset::new(vec![], Values::F64(vec![1.0])).unwrap();
        ds.attrs.insert(UNIT_ATTR.into(), AttrValue::F64(1.0));
        c.put_dataset("/x", ds);
        assert!(matches!(
            check_string_attribute(&c, "f", "/x", UNIT_ATTR, "m"),
            Err(Error::AttributeType { .. })
        ));
    }

    #[test]
    fn string_array_is_rank_error() {
        let mut c = Container::new();
        let mut ds = Dataset::new(vec![], Values::F64(vec![1.0])).unwrap();
        ds.attrs.insert(
            UNIT_ATTR.into(),
            AttrValue::StringArray(vec!["m".into(), "s".into()]),
        );
        c.put_dataset("/x", ds);
        assert!(matches!(
            check_string_attribute(&c, "f", "/x", UNIT_ATTR, "m"),
            Err(Error::AttributeRank { .. })
        ));
    }
}
