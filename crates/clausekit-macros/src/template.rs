use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Error, Expr, LitStr, Result};

/// How a `{...}` hole is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HoleSpec {
    /// `{expr}`
    Bind,
    /// `{expr:raw}`
    Raw,
    /// `{expr:param}`: bind-only values such as `Option<T>`
    Param,
    /// Any other specifier; resolved at runtime through `FormatHint::from_spec`.
    Other(String),
}

#[derive(Debug)]
pub(crate) enum Segment {
    Literal(String),
    Hole { expr: Expr, spec: HoleSpec },
}

/// Split a template into literal and hole segments.
///
/// `{{` and `}}` escape braces. Holes may contain nested braces.
pub(crate) fn parse_template(lit: &LitStr) -> Result<Vec<Segment>> {
    let raw = lit.value();
    let span = lit.span();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|(_, n)| *n) == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().map(|(_, n)| *n) == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(Error::new(span, "unmatched `}` in sql template; use `}}`")),
            '{' => {
                let mut depth = 1usize;
                let mut hole = String::new();
                loop {
                    match chars.next() {
                        Some((_, '{')) => {
                            depth += 1;
                            hole.push('{');
                        }
                        Some((_, '}')) => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            hole.push('}');
                        }
                        Some((_, ch)) => hole.push(ch),
                        None => return Err(Error::new(span, "unclosed `{` in sql template")),
                    }
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(parse_hole(&hole, span)?);
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn parse_hole(hole: &str, span: Span) -> Result<Segment> {
    let (expr_src, spec) = split_spec(hole);
    if expr_src.trim().is_empty() {
        return Err(Error::new(span, "empty `{}` in sql template"));
    }
    let expr = syn::parse_str::<Expr>(expr_src).map_err(|e| {
        Error::new(span, format!("invalid expression `{}` in sql template: {e}", expr_src.trim()))
    })?;
    Ok(Segment::Hole { expr, spec })
}

/// Split `expr:spec` at the last single `:` followed by an identifier.
fn split_spec(hole: &str) -> (&str, HoleSpec) {
    if let Some(pos) = hole.rfind(':') {
        let spec = hole[pos + 1..].trim();
        let is_path = hole[..pos].ends_with(':');
        let is_ident = !spec.is_empty() && spec.chars().all(|c| c == '_' || c.is_ascii_alphanumeric());
        if !is_path && is_ident {
            let spec = match spec {
                "raw" => HoleSpec::Raw,
                "param" => HoleSpec::Param,
                other => HoleSpec::Other(other.to_string()),
            };
            return (&hole[..pos], spec);
        }
    }
    (hole, HoleSpec::Bind)
}

/// Expand a template into a closure over `ClauseSession`.
pub(crate) fn expand(lit: LitStr) -> Result<TokenStream> {
    let segments = parse_template(&lit)?;
    let calls = segments.iter().map(|segment| match segment {
        Segment::Literal(text) => quote! {
            __clausekit_session.append_literal(#text);
        },
        Segment::Hole { expr, spec } => match spec {
            HoleSpec::Bind => quote! {
                __clausekit_session.append_formatted(#expr, ::clausekit::FormatHint::None);
            },
            HoleSpec::Raw => quote! {
                __clausekit_session.append_formatted(#expr, ::clausekit::FormatHint::Raw);
            },
            HoleSpec::Param => quote! {
                __clausekit_session.append_param(#expr);
            },
            HoleSpec::Other(name) => quote! {
                __clausekit_session.append_formatted(#expr, ::clausekit::FormatHint::from_spec(#name));
            },
        },
    });

    Ok(quote! {
        |__clausekit_session: &mut ::clausekit::ClauseSession<'_>| {
            #(#calls)*
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> LitStr {
        LitStr::new(s, Span::call_site())
    }

    fn shape(segments: &[Segment]) -> Vec<String> {
        segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => format!("L({text})"),
                Segment::Hole { spec, .. } => format!("H({spec:?})"),
            })
            .collect()
    }

    #[test]
    fn splits_literals_and_holes() {
        let segs = parse_template(&lit("Orders o ON o.Id = {customer_id}")).unwrap();
        assert_eq!(shape(&segs), vec!["L(Orders o ON o.Id = )", "H(Bind)"]);
    }

    #[test]
    fn recognizes_specs() {
        let segs = parse_template(&lit("{a:raw} {b:param} {c:other} {Kind::A}")).unwrap();
        assert_eq!(
            shape(&segs),
            vec![
                "H(Raw)",
                "L( )",
                "H(Param)",
                "L( )",
                "H(Other(\"other\"))",
                "L( )",
                "H(Bind)",
            ]
        );
    }

    #[test]
    fn escaped_braces_are_literal() {
        let segs = parse_template(&lit("'{{}}' = {x}")).unwrap();
        assert_eq!(shape(&segs), vec!["L('{}' = )", "H(Bind)"]);
    }

    #[test]
    fn expands_to_session_calls() {
        let tokens = expand(lit("o.id = {id} ORDER BY {col:raw}")).unwrap().to_string();
        let compact: String = tokens.chars().filter(|c| !c.is_whitespace()).collect();
        assert!(compact.contains("append_literal(\"o.id=\")"));
        assert!(compact.contains("append_formatted(id,::clausekit::FormatHint::None)"));
        assert!(compact.contains("append_formatted(col,::clausekit::FormatHint::Raw)"));
    }

    #[test]
    fn rejects_malformed_templates() {
        assert!(parse_template(&lit("a = {")).is_err());
        assert!(parse_template(&lit("a = }")).is_err());
        assert!(parse_template(&lit("a = {}")).is_err());
        assert!(parse_template(&lit("a = {1 +}")).is_err());
    }
}
