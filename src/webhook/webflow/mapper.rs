//! Field-map to Application mapping.
//!
//! Each canonical field resolves through an ordered alias group; the first
//! alias present in the normalized field map wins. The groups cover the
//! English snake/kebab variants and the Arabic labels the bilingual Webflow
//! forms submit. Resolved optional fields land in the `submitted_fields`
//! overflow bag under canonical camelCase keys, unmatched leftovers under
//! their normalized key, and nothing empty is ever stored.

use super::normalize::{FieldMap, as_array, as_boolean, as_string, normalize_key};
use crate::{consts, models::application::Application};
use chrono::Utc;
use derive_more::{Display, Error};
use serde_json::Value;
use std::collections::HashSet;

pub const SELLER_NAME_ALIASES: &[&str] = &[
    "full_name",
    "full-name",
    "fullname",
    "seller_name",
    "seller-name",
    "name",
    "الاسم-الكامل",
];

pub const EMAIL_ALIASES: &[&str] = &[
    "email",
    "e-mail",
    "email_address",
    "email-address",
    "البريد-الالكتروني",
];

pub const PHONE_ALIASES: &[&str] = &[
    "phone_number",
    "phone-number",
    "phone",
    "whatsapp",
    "mobile",
    "tel",
    "رقم-الهاتف",
];

pub const CATEGORY_ALIASES: &[&str] = &[
    "products_category",
    "products-category",
    "product-category",
    "category",
    "categories",
    "sales-categories",
    "فئات-البيع",
];

pub const LANGUAGE_ALIASES: &[&str] = &["language", "form-language", "lang", "اللغة"];

pub const SELLING_PAGE_ALIASES: &[&str] = &[
    "selling_page",
    "selling-page",
    "main-sales-page",
    "shop_url",
    "رابط-صفحة-البيع",
];

pub const SECONDARY_SELLING_PAGE_ALIASES: &[&str] = &[
    "secondary_selling_page",
    "secondary-selling-page",
    "second-page",
    "other-selling-page",
];

pub const CITY_ALIASES: &[&str] = &["city", "المدينة"];

pub const OTHER_PRODUCTS_ALIASES: &[&str] = &[
    "other_products",
    "other-products",
    "products-brand",
    "المنتجات-والبراند",
];

pub const VALID_PRODUCT_ALIASES: &[&str] = &[
    "valide_product",
    "valide-product",
    "valid-product",
    "valid_product",
];

pub const IMAGES_BELONG_TO_STORE_ALIASES: &[&str] = &[
    "images_belong_to_store",
    "images-belong-to-store",
    "store-images",
    "هل-الصور-تنتمي",
];

pub const PRODUCTS_TYPE_ALIASES: &[&str] =
    &["products_type", "products-type", "product-type", "نوع-المنتوج"];

pub const TIME_SELLING_ALIASES: &[&str] =
    &["time_selling", "time-selling", "selling-duration", "مدة-البيع"];

pub const FEEDBACKS_ALIASES: &[&str] = &[
    "feedbacks",
    "feedback",
    "customer-feedback",
    "customer_feedback",
    "تعليقات-الزبائن",
];

pub const RETURN_POLICIES_ALIASES: &[&str] = &[
    "return_policies",
    "return-policies",
    "return-handling",
    "return_handling",
    "إرجاع-السلعة",
];

pub const FAKE_ORDERS_ALIASES: &[&str] = &["fake_orders", "fake-orders", "طلبات-مزيفة"];

pub const BADGE_USAGE_ALIASES: &[&str] = &[
    "badge_use",
    "badge-use",
    "badge_usage",
    "badge-usage",
    "preferred-badge-use",
    "استعمال-البادج",
];

pub const DELIVERY_DURATION_ALIASES: &[&str] = &[
    "delivery_duration",
    "delivery-duration",
    "shipping-time",
    "shipping_time",
    "مدة-الشحن",
];

pub const DELIVERY_ZONE_ALIASES: &[&str] = &[
    "delivery_zone",
    "delivery-zone",
    "delivery-area",
    "delivery_area",
    "منطقة-التوصيل",
];

pub const WHATSAPP_NUMBER_ALIASES: &[&str] = &["whatsapp_number", "whatsapp-number", "whatsapp"];

pub const INSTAGRAM_ALIASES: &[&str] = &["instagram", "instagram-handle", "انستغرام"];

pub const FACEBOOK_ALIASES: &[&str] = &["facebook", "facebook-page", "فيسبوك"];

pub const TIKTOK_ALIASES: &[&str] = &["tiktok", "tiktok-handle", "تيك-توك"];

pub const NOTES_ALIASES: &[&str] = &["notes", "message", "comments", "ملاحظات"];

#[derive(Debug, Display, Error, PartialEq)]
pub enum ValidationError {
    #[display("missing required field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    #[display("invalid format for field: {_0}")]
    InvalidFormat(#[error(not(source))] &'static str),
}

/// Maps a clean field map onto a canonical [`Application`] with status
/// `pending`. Fails without side effects when a required field is missing or
/// malformed; no partial record ever leaves this function.
pub fn map(fields: &FieldMap, site_hint: Option<&str>) -> Result<Application, ValidationError> {
    let seller_name = as_string(fields, SELLER_NAME_ALIASES)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(ValidationError::MissingField("sellerName"))?;

    let email = as_string(fields, EMAIL_ALIASES)
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .ok_or(ValidationError::MissingField("email"))?;
    if !email.contains('@') {
        return Err(ValidationError::InvalidFormat("email"));
    }

    let categories = as_array(fields, CATEGORY_ALIASES);
    let category = categories
        .first()
        .cloned()
        .unwrap_or_else(|| consts::DEFAULT_CATEGORY.to_string());

    let language = as_string(fields, LANGUAGE_ALIASES).unwrap_or_else(|| {
        // bilingual deployment: the Moroccan site serves the Arabic form
        if site_hint.is_some_and(|site| site.ends_with(".ma")) {
            "ar".to_string()
        } else {
            "en".to_string()
        }
    });

    let mut consumed = HashSet::new();
    for group in [
        SELLER_NAME_ALIASES,
        EMAIL_ALIASES,
        PHONE_ALIASES,
        CATEGORY_ALIASES,
        LANGUAGE_ALIASES,
        WHATSAPP_NUMBER_ALIASES,
    ] {
        mark_consumed(fields, &mut consumed, group);
    }

    let mut bag = serde_json::Map::new();
    if !categories.is_empty() {
        bag.insert("productsCategory".into(), Value::from(categories));
    }

    let string_groups: [(&str, &[&str]); 15] = [
        ("sellingPage", SELLING_PAGE_ALIASES),
        ("secondarySellingPage", SECONDARY_SELLING_PAGE_ALIASES),
        ("city", CITY_ALIASES),
        ("otherProducts", OTHER_PRODUCTS_ALIASES),
        ("productsType", PRODUCTS_TYPE_ALIASES),
        ("timeSelling", TIME_SELLING_ALIASES),
        ("feedbacks", FEEDBACKS_ALIASES),
        ("returnPolicies", RETURN_POLICIES_ALIASES),
        ("fakeOrders", FAKE_ORDERS_ALIASES),
        ("deliveryDuration", DELIVERY_DURATION_ALIASES),
        ("deliveryZone", DELIVERY_ZONE_ALIASES),
        ("instagram", INSTAGRAM_ALIASES),
        ("facebook", FACEBOOK_ALIASES),
        ("tiktok", TIKTOK_ALIASES),
        ("notes", NOTES_ALIASES),
    ];
    for (canonical, aliases) in string_groups {
        if let Some(value) = as_string(fields, aliases) {
            bag.insert(canonical.into(), Value::from(value));
        }
        mark_consumed(fields, &mut consumed, aliases);
    }

    let boolean_groups: [(&str, &[&str]); 2] = [
        ("validProduct", VALID_PRODUCT_ALIASES),
        ("imagesBelongToStore", IMAGES_BELONG_TO_STORE_ALIASES),
    ];
    for (canonical, aliases) in boolean_groups {
        if let Some(flag) = as_boolean(fields, aliases) {
            bag.insert(canonical.into(), Value::from(flag));
        }
        mark_consumed(fields, &mut consumed, aliases);
    }

    let badge_usage = as_array(fields, BADGE_USAGE_ALIASES);
    if !badge_usage.is_empty() {
        bag.insert("badgeUsageLocations".into(), Value::from(badge_usage));
    }
    mark_consumed(fields, &mut consumed, BADGE_USAGE_ALIASES);

    // unanticipated fields survive in the bag under their normalized key
    for (key, value) in fields {
        if !consumed.contains(key) && !bag.contains_key(key) {
            bag.insert(key.clone(), value.clone());
        }
    }

    let now = Utc::now();
    Ok(Application {
        id: 0,
        seller_name,
        email,
        phone: as_string(fields, PHONE_ALIASES),
        whatsapp_number: as_string(fields, WHATSAPP_NUMBER_ALIASES),
        category,
        language,
        status: Default::default(),
        notes: None,
        submitted_fields: Value::Object(bag),
        needs_info_reminder_sent_at: None,
        reviewed_at: None,
        badge_activated_at: None,
        created_at: now,
        updated_at: now,
    })
}

/// Records which map key each resolved group actually matched, so the
/// leftover pass knows what is already accounted for.
fn mark_consumed(fields: &FieldMap, consumed: &mut HashSet<String>, aliases: &[&str]) {
    for alias in aliases {
        let key = normalize_key(alias);
        if fields.get(&key).is_some_and(|v| !v.is_null()) {
            consumed.insert(key);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::webflow::extract;
    use serde_json::json;

    fn map_payload(payload: serde_json::Value) -> Result<Application, ValidationError> {
        let extracted = extract::extract(&payload).expect("payload has fields");
        map(&extracted.fields, extracted.site.as_deref())
    }

    #[test]
    fn test_amina_scenario() {
        let application = map_payload(json!({
            "data": {"payload": {"data": {
                "full_name": "Amina",
                "email": "AMINA@X.COM",
                "products_category": "electronics,home",
                "city": "Casablanca"
            }}}
        }))
        .unwrap();

        assert_eq!(application.seller_name, "Amina");
        assert_eq!(application.email, "amina@x.com");
        assert_eq!(application.category, "electronics");
        assert_eq!(application.status.to_string(), "pending");
        assert_eq!(
            application.submitted_field("productsCategory"),
            Some(&json!(["electronics", "home"]))
        );
        assert_eq!(
            application.submitted_field("city"),
            Some(&json!("Casablanca"))
        );
    }

    #[test]
    fn test_missing_seller_name() {
        let err = map_payload(json!({"email": "a@x.com"})).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("sellerName"));
    }

    #[test]
    fn test_missing_email() {
        let err = map_payload(json!({"full-name": "Amina"})).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("email"));
    }

    #[test]
    fn test_invalid_email_format() {
        let err = map_payload(json!({
            "full-name": "Amina",
            "email": "not-an-email"
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidFormat("email"));
    }

    #[test]
    fn test_arabic_aliases_resolve() {
        let application = map_payload(json!({
            "الاسم-الكامل": "يوسف",
            "البريد-الالكتروني": "y@x.com",
            "المدينة": "مراكش",
            "فئات-البيع": ["clothing"]
        }))
        .unwrap();

        assert_eq!(application.seller_name, "يوسف");
        assert_eq!(application.category, "clothing");
        assert_eq!(application.submitted_field("city"), Some(&json!("مراكش")));
    }

    #[test]
    fn test_alias_precedence_first_match_wins() {
        let application = map_payload(json!({
            "phone": "0600000001",
            "whatsapp": "0600000002",
            "full-name": "Amina",
            "email": "a@x.com"
        }))
        .unwrap();
        assert_eq!(application.phone.as_deref(), Some("0600000001"));
        // whatsapp still resolves independently for its own group
        assert_eq!(application.whatsapp_number.as_deref(), Some("0600000002"));
    }

    #[test]
    fn test_category_defaults_to_general() {
        let application = map_payload(json!({
            "full-name": "Amina",
            "email": "a@x.com"
        }))
        .unwrap();
        assert_eq!(application.category, consts::DEFAULT_CATEGORY);
        assert_eq!(application.submitted_field("productsCategory"), None);
    }

    #[test]
    fn test_language_defaults_from_site_hint() {
        let arabic = map_payload(json!({
            "site": "mim.ma",
            "data": {"full-name": "Amina", "email": "a@x.com"}
        }))
        .unwrap();
        assert_eq!(arabic.language, "ar");

        let english = map_payload(json!({
            "site": "mim.example.com",
            "data": {"full-name": "Amina", "email": "a@x.com"}
        }))
        .unwrap();
        assert_eq!(english.language, "en");
    }

    #[test]
    fn test_leftover_fields_land_in_the_bag() {
        let application = map_payload(json!({
            "full-name": "Amina",
            "email": "a@x.com",
            "favorite color": "teal"
        }))
        .unwrap();
        assert_eq!(
            application.submitted_field("favorite-color"),
            Some(&json!("teal"))
        );
    }

    #[test]
    fn test_no_empty_values_stored() {
        let application = map_payload(json!({
            "full-name": "Amina",
            "email": "a@x.com",
            "city": "  "
        }))
        .unwrap();
        let bag = application.submitted_fields.as_object().unwrap();
        assert!(!bag.contains_key("city"));
        assert!(bag.values().all(|v| !v.is_null()));
    }

    #[test]
    fn test_store_image_ownership_coerced_to_boolean() {
        let application = map_payload(json!({
            "full-name": "Amina",
            "email": "a@x.com",
            "هل-الصور-تنتمي": "نعم"
        }))
        .unwrap();
        assert_eq!(
            application.submitted_field("imagesBelongToStore"),
            Some(&json!(true))
        );
        // the raw answer does not survive under its normalized key
        assert_eq!(application.submitted_field("هل-الصور-تنتمي"), None);
    }

    #[test]
    fn test_boolean_field_preserved_not_defaulted() {
        let application = map_payload(json!({
            "full-name": "Amina",
            "email": "a@x.com",
            "valid_product": "لا"
        }))
        .unwrap();
        assert_eq!(
            application.submitted_field("validProduct"),
            Some(&json!(false))
        );

        let ambiguous = map_payload(json!({
            "full-name": "Amina",
            "email": "a@x.com",
            "valid_product": "maybe"
        }))
        .unwrap();
        // ambiguous booleans stay out of the canonical slot
        assert_eq!(ambiguous.submitted_field("validProduct"), None);
    }
}
