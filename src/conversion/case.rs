//! Identifier case conversion
//!
//! Converts an API title such as "Media Delivery Platform" into the package
//! identifier embedded in repository names. Whitespace is deleted rather than
//! turned into a separator: existing repository names were derived this way
//! and must keep resolving.

/// Convert a camel-cased or titled label into a lowercase underscored identifier
///
/// Every uppercase character becomes `_` followed by its lowercase form,
/// leading underscores are stripped and then all whitespace is removed.
///
/// ```text
/// "MediaDelivery"            -> "media_delivery"
/// "Media Delivery Platform"  -> "media_delivery_platform"
/// "media delivery"           -> "mediadelivery"
/// ```
pub fn camel_to_snake(input: &str) -> String {
    let mut converted = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if c.is_uppercase() {
            converted.push('_');
            converted.extend(c.to_lowercase());
        } else {
            converted.push(c);
        }
    }

    converted
        .trim_start_matches('_')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
