/// Format a message template by replacing `{}` placeholders in order.
///
/// Extra placeholders are left untouched, extra values are ignored. Values
/// are never rescanned, so a value containing `{}` is inserted verbatim.
pub fn format_message(template: &str, values: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut rest = template;
    while let Some(at) = rest.find("{}") {
        result.push_str(&rest[..at]);
        match values.next() {
            Some(value) => result.push_str(value),
            None => result.push_str("{}"),
        }
        rest = &rest[at + 2..];
    }
    result.push_str(rest);
    result
}
