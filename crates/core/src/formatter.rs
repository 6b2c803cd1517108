//! Wire payload projections for webhook delivery.
//!
//! `format_product` and `format_order` are pure, total functions: every
//! field of the partial source views is defaulted up front (0, empty
//! string, empty sequence) so a partially hydrated entity can never abort
//! an enclosing dispatch. The caller always receives a usable payload.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::attribution::AttributionRecord;
use crate::catalog::{ImageSource, ProductSource, StoreSource, STATUS_ENABLED, VISIBILITY_BOTH};
use crate::sales::{AddressSource, OrderItemSource, OrderSource};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Product payload
// ---------------------------------------------------------------------------

/// Stock snapshot embedded in a product payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPayload {
    pub qty: f64,
    pub is_in_stock: bool,
}

/// One image entry: a resolved media URL, or the raw file path when URL
/// resolution was not possible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePayload {
    pub url: String,
    pub label: String,
    pub position: i32,
}

/// Store/website summary embedded in a product payload. Each field is
/// independently defaulted when the source store handle is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StorePayload {
    pub store_id: DbId,
    pub store_code: String,
    pub store_name: String,
    pub store_url: String,
    pub website_id: DbId,
    pub website_name: String,
}

/// Flattened product projection sent to the marketing platform.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPayload {
    pub id: DbId,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub price: f64,
    /// `null` when absent or zero.
    pub special_price: Option<f64>,
    pub status: i32,
    pub visibility: i32,
    pub type_id: String,
    pub attribute_set_id: i32,
    pub website_ids: Vec<DbId>,
    pub category_ids: Vec<DbId>,
    pub stock_data: StockPayload,
    pub images: Vec<ImagePayload>,
    pub url: String,
    pub created_at: String,
    pub updated_at: String,
    pub custom_attributes: BTreeMap<String, serde_json::Value>,
    pub store: StorePayload,
    /// Present only on the minimal fallback shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProductPayload {
    /// Minimal fallback shape: identity fields plus an error description.
    ///
    /// Used when full payload assembly fails downstream (e.g. serialization)
    /// so the dispatcher still receives a usable object.
    pub fn minimal(id: DbId, sku: &str, name: &str, error: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "sku": sku,
            "name": name,
            "error": format!("Data formatting failed: {error}"),
        })
    }
}

/// Project a possibly-partial product view onto the wire shape.
pub fn format_product(source: &ProductSource) -> ProductPayload {
    ProductPayload {
        id: source.id,
        sku: source.sku.clone().unwrap_or_default(),
        name: source.name.clone().unwrap_or_default(),
        description: source.description.clone().unwrap_or_default(),
        short_description: source.short_description.clone().unwrap_or_default(),
        price: source.price.unwrap_or(0.0),
        special_price: source.special_price.filter(|price| *price != 0.0),
        status: source.status.unwrap_or(STATUS_ENABLED),
        visibility: source.visibility.unwrap_or(VISIBILITY_BOTH),
        type_id: source
            .type_id
            .clone()
            .unwrap_or_else(|| "simple".to_string()),
        attribute_set_id: source.attribute_set_id.unwrap_or(0),
        website_ids: source.website_ids.clone(),
        category_ids: source.category_ids.clone(),
        stock_data: StockPayload {
            qty: source.stock.as_ref().and_then(|s| s.qty).unwrap_or(0.0),
            is_in_stock: source
                .stock
                .as_ref()
                .and_then(|s| s.is_in_stock)
                .unwrap_or(true),
        },
        images: source.images.iter().map(format_image).collect(),
        url: product_url(source),
        created_at: format_timestamp(&source.created_at),
        updated_at: format_timestamp(&source.updated_at),
        custom_attributes: source.custom_attributes.clone(),
        store: format_store(source.store.as_ref()),
        error: None,
    }
}

/// A resolved media URL when available, else the raw file path.
fn format_image(image: &ImageSource) -> ImagePayload {
    ImagePayload {
        url: image
            .media_url
            .clone()
            .unwrap_or_else(|| image.file.clone()),
        label: image.label.clone().unwrap_or_default(),
        position: image.position.unwrap_or(0),
    }
}

/// The product page URL: prefer the resolved URL, fall back to composing
/// base URL + url key, else empty.
fn product_url(source: &ProductSource) -> String {
    if let Some(url) = &source.product_url {
        return url.clone();
    }
    if let (Some(key), Some(base)) = (
        source.url_key.as_deref(),
        source
            .store
            .as_ref()
            .and_then(|store| store.base_url.as_deref()),
    ) {
        if !key.is_empty() {
            return format!("{base}{key}.html");
        }
    }
    String::new()
}

fn format_store(store: Option<&StoreSource>) -> StorePayload {
    let Some(store) = store else {
        return StorePayload::default();
    };
    StorePayload {
        store_id: store.id.unwrap_or(0),
        store_code: store.code.clone().unwrap_or_default(),
        store_name: store.name.clone().unwrap_or_default(),
        store_url: store.base_url.clone().unwrap_or_default(),
        website_id: store.website_id.unwrap_or(0),
        website_name: store.website_name.clone().unwrap_or_default(),
    }
}

fn format_timestamp(ts: &Option<crate::types::Timestamp>) -> String {
    ts.map(|t| t.to_rfc3339()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Order payload
// ---------------------------------------------------------------------------

/// One formatted order line item.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemPayload {
    pub item_id: DbId,
    pub product_id: DbId,
    pub sku: String,
    pub name: String,
    pub qty_ordered: f64,
    pub qty_shipped: f64,
    pub qty_invoiced: f64,
    pub qty_refunded: f64,
    pub price: f64,
    pub original_price: f64,
    pub row_total: f64,
    pub row_total_incl_tax: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub product_options: serde_json::Value,
}

/// Formatted billing/shipping address. All fields defaulted when the order
/// carries no address of that type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddressPayload {
    pub id: DbId,
    pub address_type: String,
    pub firstname: String,
    pub lastname: String,
    pub company: String,
    pub street: String,
    pub city: String,
    pub region: String,
    pub region_id: DbId,
    pub postcode: String,
    pub country_id: String,
    pub telephone: String,
    pub fax: String,
}

/// Formatted order header, items, addresses, and attached attribution.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPayload {
    pub order_id: String,
    pub entity_id: DbId,
    pub customer_id: Option<DbId>,
    pub customer_email: String,
    pub customer_firstname: String,
    pub customer_lastname: String,
    pub customer_group_id: DbId,
    pub store_id: DbId,
    pub website_id: DbId,
    pub grand_total: f64,
    pub subtotal: f64,
    pub shipping_amount: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub currency_code: String,
    pub order_status: String,
    pub payment_method: String,
    pub shipping_method: String,
    pub created_at: String,
    pub updated_at: String,
    pub items: Vec<OrderItemPayload>,
    pub billing_address: AddressPayload,
    pub shipping_address: AddressPayload,
    /// The session's attribution record, or an empty object.
    pub attribution: serde_json::Value,
}

/// Project an order view plus optional attribution onto the wire shape.
pub fn format_order(source: &OrderSource, attribution: Option<&AttributionRecord>) -> OrderPayload {
    OrderPayload {
        order_id: source.increment_id.clone().unwrap_or_default(),
        entity_id: source.entity_id,
        customer_id: source.customer_id,
        customer_email: source.customer_email.clone().unwrap_or_default(),
        customer_firstname: source.customer_firstname.clone().unwrap_or_default(),
        customer_lastname: source.customer_lastname.clone().unwrap_or_default(),
        customer_group_id: source.customer_group_id.unwrap_or(0),
        store_id: source.store_id.unwrap_or(0),
        website_id: source.website_id.unwrap_or(0),
        grand_total: source.grand_total.unwrap_or(0.0),
        subtotal: source.subtotal.unwrap_or(0.0),
        shipping_amount: source.shipping_amount.unwrap_or(0.0),
        tax_amount: source.tax_amount.unwrap_or(0.0),
        discount_amount: source.discount_amount.unwrap_or(0.0),
        currency_code: source.currency_code.clone().unwrap_or_default(),
        order_status: source.status.clone().unwrap_or_default(),
        payment_method: source.payment_method.clone().unwrap_or_default(),
        shipping_method: source.shipping_method.clone().unwrap_or_default(),
        created_at: format_timestamp(&source.created_at),
        updated_at: format_timestamp(&source.updated_at),
        items: source.items.iter().map(format_order_item).collect(),
        billing_address: format_address(source.billing_address.as_ref()),
        shipping_address: format_address(source.shipping_address.as_ref()),
        attribution: attribution
            .and_then(|record| serde_json::to_value(record).ok())
            .unwrap_or_else(|| serde_json::json!({})),
    }
}

fn format_order_item(item: &OrderItemSource) -> OrderItemPayload {
    OrderItemPayload {
        item_id: item.item_id,
        product_id: item.product_id.unwrap_or(0),
        sku: item.sku.clone().unwrap_or_default(),
        name: item.name.clone().unwrap_or_default(),
        qty_ordered: item.qty_ordered.unwrap_or(0.0),
        qty_shipped: item.qty_shipped.unwrap_or(0.0),
        qty_invoiced: item.qty_invoiced.unwrap_or(0.0),
        qty_refunded: item.qty_refunded.unwrap_or(0.0),
        price: item.price.unwrap_or(0.0),
        original_price: item.original_price.unwrap_or(0.0),
        row_total: item.row_total.unwrap_or(0.0),
        row_total_incl_tax: item.row_total_incl_tax.unwrap_or(0.0),
        tax_amount: item.tax_amount.unwrap_or(0.0),
        discount_amount: item.discount_amount.unwrap_or(0.0),
        product_options: item
            .product_options
            .clone()
            .unwrap_or(serde_json::Value::Null),
    }
}

fn format_address(address: Option<&AddressSource>) -> AddressPayload {
    let Some(address) = address else {
        return AddressPayload::default();
    };
    AddressPayload {
        id: address.id,
        address_type: address.address_type.clone().unwrap_or_default(),
        firstname: address.firstname.clone().unwrap_or_default(),
        lastname: address.lastname.clone().unwrap_or_default(),
        company: address.company.clone().unwrap_or_default(),
        street: address.street.clone().unwrap_or_default(),
        city: address.city.clone().unwrap_or_default(),
        region: address.region.clone().unwrap_or_default(),
        region_id: address.region_id.unwrap_or(0),
        postcode: address.postcode.clone().unwrap_or_default(),
        country_id: address.country_id.clone().unwrap_or_default(),
        telephone: address.telephone.clone().unwrap_or_default(),
        fax: address.fax.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StockSource;
    use chrono::TimeZone;

    fn full_product() -> ProductSource {
        let mut custom = BTreeMap::new();
        custom.insert("color".to_string(), serde_json::json!("red"));

        ProductSource {
            id: 42,
            sku: Some("ABC123".into()),
            name: Some("Demo Widget".into()),
            description: Some("A demo widget".into()),
            short_description: Some("Demo".into()),
            price: Some(19.99),
            special_price: Some(14.99),
            status: Some(1),
            visibility: Some(4),
            type_id: Some("simple".into()),
            attribute_set_id: Some(9),
            website_ids: vec![1, 2],
            category_ids: vec![3, 5],
            stock: Some(StockSource {
                qty: Some(12.0),
                is_in_stock: Some(true),
            }),
            images: vec![ImageSource {
                file: "/a/b/widget.jpg".into(),
                label: Some("Front".into()),
                position: Some(1),
                media_url: Some("https://cdn.shop.example/a/b/widget.jpg".into()),
            }],
            product_url: Some("https://shop.example/demo-widget.html".into()),
            url_key: Some("demo-widget".into()),
            created_at: Some(chrono::Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            updated_at: Some(chrono::Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap()),
            custom_attributes: custom,
            store: Some(StoreSource {
                id: Some(1),
                code: Some("default".into()),
                name: Some("Default Store".into()),
                base_url: Some("https://shop.example/".into()),
                website_id: Some(1),
                website_name: Some("Main Website".into()),
            }),
        }
    }

    #[test]
    fn full_product_reproduces_every_source_field() {
        let payload = format_product(&full_product());

        assert_eq!(payload.id, 42);
        assert_eq!(payload.sku, "ABC123");
        assert_eq!(payload.name, "Demo Widget");
        assert_eq!(payload.price, 19.99);
        assert_eq!(payload.special_price, Some(14.99));
        assert_eq!(payload.status, 1);
        assert_eq!(payload.visibility, 4);
        assert_eq!(payload.website_ids, vec![1, 2]);
        assert_eq!(payload.category_ids, vec![3, 5]);
        assert_eq!(payload.stock_data.qty, 12.0);
        assert!(payload.stock_data.is_in_stock);
        assert_eq!(payload.images.len(), 1);
        assert_eq!(payload.images[0].url, "https://cdn.shop.example/a/b/widget.jpg");
        assert_eq!(payload.images[0].label, "Front");
        assert_eq!(payload.url, "https://shop.example/demo-widget.html");
        assert_eq!(payload.custom_attributes["color"], "red");
        assert_eq!(payload.store.store_code, "default");
        assert_eq!(payload.store.website_name, "Main Website");
        assert!(payload.error.is_none());
    }

    #[test]
    fn bare_product_gets_defaults_without_failing() {
        let payload = format_product(&ProductSource::bare(7));

        assert_eq!(payload.id, 7);
        assert_eq!(payload.sku, "");
        assert_eq!(payload.name, "");
        assert_eq!(payload.price, 0.0);
        assert_eq!(payload.special_price, None);
        assert_eq!(payload.status, STATUS_ENABLED);
        assert_eq!(payload.visibility, VISIBILITY_BOTH);
        assert_eq!(payload.type_id, "simple");
        assert_eq!(payload.attribute_set_id, 0);
        assert!(payload.website_ids.is_empty());
        assert_eq!(payload.stock_data.qty, 0.0);
        assert!(payload.stock_data.is_in_stock);
        assert!(payload.images.is_empty());
        assert_eq!(payload.url, "");
        assert_eq!(payload.created_at, "");
        assert_eq!(payload.store, StorePayload::default());
    }

    #[test]
    fn zero_special_price_serializes_as_null() {
        let mut source = full_product();
        source.special_price = Some(0.0);
        let payload = format_product(&source);
        assert_eq!(payload.special_price, None);

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["special_price"].is_null());
    }

    #[test]
    fn image_without_resolved_url_falls_back_to_file_path() {
        let mut source = full_product();
        source.images = vec![ImageSource {
            file: "/a/b/raw.jpg".into(),
            label: None,
            position: None,
            media_url: None,
        }];
        let payload = format_product(&source);
        assert_eq!(payload.images[0].url, "/a/b/raw.jpg");
        assert_eq!(payload.images[0].label, "");
        assert_eq!(payload.images[0].position, 0);
    }

    #[test]
    fn url_composed_from_url_key_when_unresolved() {
        let mut source = full_product();
        source.product_url = None;
        let payload = format_product(&source);
        assert_eq!(payload.url, "https://shop.example/demo-widget.html");

        source.url_key = None;
        let payload = format_product(&source);
        assert_eq!(payload.url, "");
    }

    #[test]
    fn minimal_fallback_carries_error_description() {
        let value = ProductPayload::minimal(42, "ABC123", "Demo Widget", "boom");
        assert_eq!(value["id"], 42);
        assert_eq!(value["sku"], "ABC123");
        assert_eq!(value["error"], "Data formatting failed: boom");
    }

    #[test]
    fn order_without_attribution_gets_empty_object() {
        let payload = format_order(&OrderSource::default(), None);
        assert_eq!(payload.attribution, serde_json::json!({}));
        assert_eq!(payload.order_id, "");
        assert_eq!(payload.grand_total, 0.0);
        assert!(payload.items.is_empty());
        assert_eq!(payload.billing_address.city, "");
    }

    #[test]
    fn order_carries_attached_attribution() {
        let record = AttributionRecord::from_cart_add("ABC123", "s1", 1_700_000_000);
        let source = OrderSource {
            entity_id: 100,
            increment_id: Some("000000042".into()),
            grand_total: Some(39.98),
            items: vec![OrderItemSource {
                item_id: 1,
                sku: Some("ABC123".into()),
                qty_ordered: Some(2.0),
                price: Some(19.99),
                ..Default::default()
            }],
            ..Default::default()
        };

        let payload = format_order(&source, Some(&record));
        assert_eq!(payload.order_id, "000000042");
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].sku, "ABC123");
        assert_eq!(payload.items[0].qty_ordered, 2.0);
        assert_eq!(payload.attribution["sku"], "ABC123");
        assert_eq!(payload.attribution["action"], "add_to_cart");
    }
}
