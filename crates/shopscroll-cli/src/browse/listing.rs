use shopscroll_storefront::{CollectionItem, ProductItem};

/// One printed line per feed item.
pub(super) trait Listing {
    fn line(&self) -> String;
}

impl Listing for ProductItem {
    fn line(&self) -> String {
        let min = &self.price_range.min_variant_price;
        let max = &self.price_range.max_variant_price;
        let price = if min.amount == max.amount {
            format!("{} {}", min.amount, min.currency_code)
        } else {
            format!("{}-{} {}", min.amount, max.amount, min.currency_code)
        };
        format!("{}  {}  {}", self.title, price, self.variant_url())
    }
}

impl Listing for CollectionItem {
    fn line(&self) -> String {
        format!("{}  /collections/{}", self.title, self.handle)
    }
}
