//! Product links that preselect a variant.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::types::SelectedOption;

const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Option Shopify attaches to products that have a single variant.
const DEFAULT_TITLE: (&str, &str) = ("Title", "Default Title");

/// `/products/{handle}?Name=Value&…` for the given variant options.
///
/// Options keep their order. The single-variant placeholder
/// (`Title=Default Title`) carries no information and is left out; with no
/// remaining options the bare product path is returned.
#[must_use]
pub fn variant_url(handle: &str, selected_options: &[SelectedOption]) -> String {
    let path = format!("/products/{}", utf8_percent_encode(handle, QUERY_COMPONENT));
    with_variant_query(&path, selected_options)
}

/// Appends the options of a variant to an already encoded `path`.
#[must_use]
pub fn with_variant_query(path: &str, selected_options: &[SelectedOption]) -> String {
    let query = selected_options
        .iter()
        .filter(|o| !is_default_title(o))
        .map(|o| {
            format!(
                "{}={}",
                utf8_percent_encode(&o.name, QUERY_COMPONENT),
                utf8_percent_encode(&o.value, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}

/// Whether `option` is the placeholder of a single-variant product.
#[must_use]
pub fn is_default_title(option: &SelectedOption) -> bool {
    (option.name.as_str(), option.value.as_str()) == DEFAULT_TITLE
}

/// Reads variant options from a product page's query string.
///
/// Every `name=value` pair is an option, decoded the way browsers encode
/// form values (`+` is a space). Pairs with an empty name or value are
/// skipped.
#[must_use]
pub fn selected_options_from_query(query: &str) -> Vec<SelectedOption> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| SelectedOption {
            name: decode_component(name),
            value: decode_component(value),
        })
        .filter(|o| !o.name.is_empty() && !o.value.is_empty())
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(name: &str, value: &str) -> SelectedOption {
        SelectedOption {
            name: name.to_owned(),
            value: value.to_owned(),
        }
    }

    #[test]
    fn options_become_query_pairs_in_order() {
        let url = variant_url("hoodie", &[opt("Color", "Black"), opt("Size", "XL")]);
        assert_eq!(url, "/products/hoodie?Color=Black&Size=XL");
    }

    #[test]
    fn values_are_percent_encoded() {
        let url = variant_url("tee", &[opt("Fit", "Relaxed & Long")]);
        assert_eq!(url, "/products/tee?Fit=Relaxed%20%26%20Long");
    }

    #[test]
    fn default_title_option_is_omitted() {
        assert_eq!(
            variant_url("gift-card", &[opt("Title", "Default Title")]),
            "/products/gift-card"
        );
    }

    #[test]
    fn no_options_yields_product_path() {
        assert_eq!(variant_url("mug", &[]), "/products/mug");
    }

    #[test]
    fn variant_query_appends_to_any_path() {
        assert_eq!(
            with_variant_query("/api/v1/products/hoodie", &[opt("Size", "XL")]),
            "/api/v1/products/hoodie?Size=XL"
        );
    }

    #[test]
    fn query_string_becomes_selected_options() {
        let options = selected_options_from_query("?Color=Dark+Green&Fit=Relaxed%20%26%20Long&Size=");
        assert_eq!(
            options,
            vec![opt("Color", "Dark Green"), opt("Fit", "Relaxed & Long")]
        );
        assert!(selected_options_from_query("").is_empty());
    }

    #[test]
    fn selected_options_survive_a_variant_url() {
        let options = vec![opt("Color", "Black / White"), opt("Size", "XL")];
        let url = variant_url("hoodie", &options);
        let query = url.split_once('?').map_or("", |(_, q)| q);
        assert_eq!(selected_options_from_query(query), options);
    }
}
