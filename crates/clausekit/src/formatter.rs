//! Per-value formatting: bind as a parameter or inline as raw text.
//!
//! Every dynamic value is bound by default. Inlining requires [`FormatHint::Raw`], so
//! all injection-sensitive call sites can be found by searching for `Raw` (or `:raw`
//! inside `sql!` templates).

use crate::param::{Param, ParamStore};
use crate::settings::{BuilderSettings, PlaceholderStyle};

/// How a dynamic value is written into the SQL text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FormatHint {
    /// Bind the value as a parameter.
    #[default]
    None,
    /// Inline the value's textual form verbatim.
    Raw,
}

impl FormatHint {
    /// The format specifier that selects [`FormatHint::Raw`].
    pub const RAW_SPEC: &'static str = "raw";

    /// Map a format specifier to a hint.
    ///
    /// Only an exact `"raw"` selects raw inlining; everything else binds.
    pub fn from_spec(spec: &str) -> Self {
        if spec == Self::RAW_SPEC {
            FormatHint::Raw
        } else {
            FormatHint::None
        }
    }

    /// Map an optional format specifier to a hint. `None` always binds.
    pub fn from_optional_spec(spec: Option<&str>) -> Self {
        spec.map(Self::from_spec).unwrap_or_default()
    }
}

/// What the formatter did with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatted {
    /// Bound as the parameter at this 0-based index.
    Bound(usize),
    /// Inlined as text.
    Inlined,
}

/// Write `value` into `out`, binding it in `store` unless `hint` is [`FormatHint::Raw`].
///
/// A raw hint on a value without a textual form falls back to binding.
pub(crate) fn format_value(
    out: &mut String,
    store: &mut ParamStore,
    settings: &BuilderSettings,
    value: Param,
    hint: FormatHint,
) -> Formatted {
    if hint == FormatHint::Raw {
        match value.raw_text() {
            Some(text) => {
                out.push_str(&text);
                return Formatted::Inlined;
            }
            None => {
                tracing::warn!(
                    target: "clausekit.sql",
                    "raw format requested for a value without a textual form; binding it instead"
                );
            }
        }
    }

    // Each `?` consumes its own binding, so anonymous placeholders never share one.
    let reuse = settings.reuse_parameters && settings.placeholder != PlaceholderStyle::Question;
    let index = store.bind(value, &settings.parameter_name_prefix, reuse);
    let name = store.get(index).map(|b| b.name()).unwrap_or_default();
    settings.placeholder.write(out, index, name);
    Formatted::Bound(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_raw_spec_inlines() {
        assert_eq!(FormatHint::from_spec("raw"), FormatHint::Raw);
        assert_eq!(FormatHint::from_spec("RAW"), FormatHint::None);
        assert_eq!(FormatHint::from_spec("other"), FormatHint::None);
        assert_eq!(FormatHint::from_spec(""), FormatHint::None);
        assert_eq!(FormatHint::from_optional_spec(None), FormatHint::None);
        assert_eq!(FormatHint::from_optional_spec(Some("raw")), FormatHint::Raw);
    }

    #[test]
    fn default_hint_binds() {
        let mut out = String::from("id = ");
        let mut store = ParamStore::new();
        let settings = BuilderSettings::default();
        let r = format_value(&mut out, &mut store, &settings, Param::new(42_i64), FormatHint::None);
        assert_eq!(r, Formatted::Bound(0));
        assert_eq!(out, "id = $1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn raw_hint_inlines_without_binding() {
        let mut out = String::from("ORDER BY ");
        let mut store = ParamStore::new();
        let settings = BuilderSettings::default();
        let r = format_value(&mut out, &mut store, &settings, Param::new("created_at"), FormatHint::Raw);
        assert_eq!(r, Formatted::Inlined);
        assert_eq!(out, "ORDER BY created_at");
        assert!(store.is_empty());
    }

    #[test]
    fn raw_hint_on_opaque_value_binds() {
        let mut out = String::new();
        let mut store = ParamStore::new();
        let settings = BuilderSettings::default();
        let r = format_value(&mut out, &mut store, &settings, Param::opaque(Some(1_i32)), FormatHint::Raw);
        assert_eq!(r, Formatted::Bound(0));
        assert_eq!(out, "$1");
    }

    #[test]
    fn named_placeholders_use_generated_names() {
        let mut out = String::new();
        let mut store = ParamStore::new();
        let settings = BuilderSettings::default().with_placeholder(PlaceholderStyle::Named { prefix: '@' });
        format_value(&mut out, &mut store, &settings, Param::new(1_i32), FormatHint::None);
        out.push_str(", ");
        format_value(&mut out, &mut store, &settings, Param::new(2_i32), FormatHint::None);
        assert_eq!(out, "@p0, @p1");
    }

    #[test]
    fn reused_values_share_a_placeholder() {
        let mut out = String::new();
        let mut store = ParamStore::new();
        let settings = BuilderSettings::default().with_reuse_parameters(true);
        format_value(&mut out, &mut store, &settings, Param::new(7_i32), FormatHint::None);
        out.push_str(" OR ");
        format_value(&mut out, &mut store, &settings, Param::new(7_i32), FormatHint::None);
        assert_eq!(out, "$1 OR $1");
        assert_eq!(store.len(), 1);
    }
}
