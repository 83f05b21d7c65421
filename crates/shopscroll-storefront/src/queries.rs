//! GraphQL documents for the storefront listings.
//!
//! Product listings page forward with `$first`/`$after`. Collection routes
//! take their position from the URL and may page in either direction, so
//! they declare `$first`/`$last`/`$startCursor`/`$endCursor`. The product
//! page resolves its variant from `$selectedOptions`.

/// Fields rendered on a product card.
pub const PRODUCT_ITEM_FRAGMENT: &str = r"
fragment MoneyProductItem on MoneyV2 {
  amount
  currencyCode
}
fragment ProductItem on Product {
  id
  handle
  title
  featuredImage {
    id
    altText
    url
    width
    height
  }
  priceRange {
    minVariantPrice {
      ...MoneyProductItem
    }
    maxVariantPrice {
      ...MoneyProductItem
    }
  }
  variants(first: 1) {
    nodes {
      selectedOptions {
        name
        value
      }
    }
  }
}
";

const PRODUCTS_OPERATION: &str = r"
query Products($first: Int, $after: String) {
  products(first: $first, after: $after) {
    nodes {
      ...ProductItem
    }
    pageInfo {
      hasNextPage
      hasPreviousPage
      startCursor
      endCursor
    }
  }
}
";

const COLLECTIONS_OPERATION: &str = r"
query StoreCollections(
  $first: Int
  $last: Int
  $startCursor: String
  $endCursor: String
) {
  collections(first: $first, last: $last, before: $startCursor, after: $endCursor) {
    nodes {
      id
      title
      handle
      image {
        id
        url
        altText
        width
        height
      }
    }
    pageInfo {
      hasNextPage
      hasPreviousPage
      startCursor
      endCursor
    }
  }
}
";

const COLLECTION_OPERATION: &str = r"
query Collection(
  $handle: String!
  $first: Int
  $last: Int
  $startCursor: String
  $endCursor: String
) {
  collection(handle: $handle) {
    id
    handle
    title
    description
    products(first: $first, last: $last, before: $startCursor, after: $endCursor) {
      nodes {
        ...ProductItem
      }
      pageInfo {
        hasPreviousPage
        hasNextPage
        startCursor
        endCursor
      }
    }
  }
}
";

const PRODUCT_VARIANT_FRAGMENT: &str = r"
fragment ProductVariant on ProductVariant {
  id
  title
  availableForSale
  sku
  price {
    amount
    currencyCode
  }
  compareAtPrice {
    amount
    currencyCode
  }
  image {
    id
    url
    altText
    width
    height
  }
  selectedOptions {
    name
    value
  }
}
";

const PRODUCT_OPERATION: &str = r"
query Product($handle: String!, $selectedOptions: [SelectedOptionInput!]!) {
  product(handle: $handle) {
    id
    handle
    title
    vendor
    description
    descriptionHtml
    collections(first: 1) {
      nodes {
        id
        handle
        title
      }
    }
    options {
      name
      optionValues {
        name
      }
    }
    selectedVariant: variantBySelectedOptions(
      selectedOptions: $selectedOptions
      ignoreUnknownOptions: true
      caseInsensitiveMatch: true
    ) {
      ...ProductVariant
    }
    variants(first: 1) {
      nodes {
        ...ProductVariant
      }
    }
  }
}
";

/// Connection path of the products listing inside `data`.
pub const PRODUCTS_CONNECTION: &str = "products";
/// Connection path of the collections listing inside `data`.
pub const COLLECTIONS_CONNECTION: &str = "collections";
/// Connection path of a collection's products inside `data`.
pub const COLLECTION_PRODUCTS_CONNECTION: &str = "collection.products";

#[must_use]
pub fn products_query() -> String {
    format!("{PRODUCT_ITEM_FRAGMENT}{PRODUCTS_OPERATION}")
}

#[must_use]
pub fn collections_query() -> String {
    COLLECTIONS_OPERATION.to_owned()
}

#[must_use]
pub fn collection_query() -> String {
    format!("{PRODUCT_ITEM_FRAGMENT}{COLLECTION_OPERATION}")
}

/// Product page query, resolving `selectedVariant` from `$selectedOptions`.
#[must_use]
pub fn product_query() -> String {
    format!("{PRODUCT_VARIANT_FRAGMENT}{PRODUCT_OPERATION}")
}
