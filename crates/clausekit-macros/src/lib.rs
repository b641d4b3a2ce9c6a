//! Template macros for clausekit
//!
//! Provides the `sql!` macro, which turns an interpolated SQL template into a
//! closure accepted by every `FluentBuilder` clause entry point.

use proc_macro::TokenStream;
use syn::{LitStr, parse_macro_input};

mod template;

/// Build a clause body from an interpolated template.
///
/// # Example
///
/// ```ignore
/// use clausekit::{FluentBuilder, sql};
///
/// let mut b = FluentBuilder::new();
/// b.left_join(sql!("orders o ON o.customer_id = {customer_id}"))?
///     .order_by(sql!("{sort_column:raw} DESC"))?;
/// ```
///
/// # Holes
///
/// - `{expr}` - bind the value as a parameter
/// - `{expr:raw}` - write the value's text directly into the SQL
/// - `{expr:param}` - bind a value that has no text form (`Option<T>`, `Vec<T>`, ...)
/// - `{{` / `}}` - literal braces
///
/// Hole expressions are taken by value and evaluated only when the clause is enabled.
#[proc_macro]
pub fn sql(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as LitStr);
    template::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
