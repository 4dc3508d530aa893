//! Product catalog and list filtering.
//!
//! The storefront ships with a built-in catalog so the cart can be exercised
//! without the order service. Listings fetched from the service can be
//! wrapped with [`Catalog::from_products`] and filtered the same way.

use std::sync::Arc;

use nearwomen_core::{Category, Product, ProductId};
use rust_decimal::Decimal;

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/200";

/// (id, name, price in cents, category, description, stock)
type SeedRow = (i32, &'static str, i64, Category, &'static str, u32);

const SEED: [SeedRow; 16] = [
    (
        1,
        "Organic Cotton Menstrual Pads",
        1299,
        Category::Menstrual,
        "Pack of 10 reusable organic cotton pads. Soft, chemical-free, and environmentally friendly.",
        45,
    ),
    (
        2,
        "Menstrual Cup",
        2499,
        Category::Menstrual,
        "Medical-grade silicone menstrual cup. Reusable for up to 10 years.",
        38,
    ),
    (
        3,
        "Period Pain Relief Heat Patches",
        1599,
        Category::Menstrual,
        "Pack of 5 adhesive heat patches. Provides up to 8 hours of soothing relief.",
        27,
    ),
    (
        4,
        "Complete Menstrual Kit",
        3999,
        Category::Menstrual,
        "Includes menstrual cup, organic pads, heat patches, and educational booklet.",
        19,
    ),
    (
        5,
        "Iron-Rich Protein Powder",
        2999,
        Category::Food,
        "Plant-based protein powder with added iron. Great for smoothies during menstruation.",
        34,
    ),
    (
        6,
        "Women's Multivitamin Pack",
        1999,
        Category::Food,
        "30-day supply of essential vitamins and minerals tailored for women's health.",
        50,
    ),
    (
        7,
        "Omega-3 DHA Supplements",
        2499,
        Category::Food,
        "60 capsules of omega-3 fatty acids. Supports brain and heart health.",
        42,
    ),
    (
        8,
        "Herbal Tea Collection",
        1899,
        Category::Food,
        "Set of 4 caffeine-free herbal teas. Includes chamomile, ginger, peppermint, and raspberry leaf.",
        29,
    ),
    (
        9,
        "Personal Alarm Keychain",
        1999,
        Category::Safety,
        "140dB emergency alarm with LED light. Easily attaches to keys or bag.",
        23,
    ),
    (
        10,
        "Self-Defense Pepper Spray",
        2499,
        Category::Safety,
        "Police-strength pepper spray with belt clip. Effective 10-foot range.",
        17,
    ),
    (
        11,
        "Safety Whistle Set",
        1299,
        Category::Safety,
        "Set of 3 high-decibel whistles. Water-resistant and compact design.",
        45,
    ),
    (
        12,
        "Runner's Safety Kit",
        3499,
        Category::Safety,
        "Includes personal alarm, reflective gear, ID bracelet, and safety app subscription.",
        15,
    ),
    (
        13,
        "Yoga Mat",
        3999,
        Category::Wellness,
        "Non-slip eco-friendly yoga mat. Perfect for home practice or studio use.",
        22,
    ),
    (
        14,
        "Aromatherapy Diffuser",
        2999,
        Category::Wellness,
        "Ultrasonic essential oil diffuser with color-changing LED light.",
        31,
    ),
    (
        15,
        "Meditation Cushion Set",
        4999,
        Category::Wellness,
        "Includes meditation cushion, mat, and guided meditation audio files.",
        18,
    ),
    (
        16,
        "Sleep & Stress Relief Bundle",
        5999,
        Category::Wellness,
        "Complete set with weighted eye mask, lavender spray, herbal tea, and sleep journal.",
        10,
    ),
];

/// Which products a listing shows.
///
/// A product matches when its category equals `category` (any category if
/// `None`) and its name or description contains `search`, ignoring case.
/// A blank search matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub search: Option<String>,
}

impl ProductFilter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_lowercase();
        product.matches_search(&needle)
    }
}

/// An immutable product listing. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
}

impl Catalog {
    /// The built-in sixteen-product catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let products = SEED
            .iter()
            .map(|&(id, name, cents, category, description, stock)| Product {
                id: ProductId::new(id),
                name: name.to_string(),
                price: Decimal::new(cents, 2),
                category,
                description: description.to_string(),
                image: PLACEHOLDER_IMAGE.to_string(),
                stock,
            })
            .collect();
        Self {
            products: Arc::new(products),
        }
    }

    #[must_use]
    pub const fn from_products(products: Arc<Vec<Product>>) -> Self {
        Self { products }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Products matching `filter`, in catalog order.
    #[must_use]
    pub fn filter(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
