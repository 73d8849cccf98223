//! Generic product table.

use std::sync::LazyLock;

use super::Product;
use crate::types::{Badge, ItemId, Price};

const IMAGE_PARAMS: &str = "ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&q=80";

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        product(101, "Vintage Graphic Tee", 3999, "photo-1576566588028-4147f3842f27", 764, "Comfortable cotton t-shirt with unique retro design", "Clothing"),
        Product {
            original_price: Some(Price::from_cents(12999)),
            badge: Some(Badge::Sale),
            ..product(102, "Minimalist Watch", 8999, "photo-1591561954557-26941169b49e", 774, "Elegant stainless steel with genuine leather strap", "Accessories")
        },
        product(103, "Designer Sunglasses", 12999, "photo-1560343090-f0409e92791a", 764, "Polarized lenses with durable acetate frames", "Accessories"),
        product(104, "Ceramic Plant Pot", 4999, "photo-1511499767150-a48a237f0083", 880, "Handcrafted ceramic with minimalist design", "Home Decor"),
        product(105, "Urban Sneakers", 7999, "photo-1631729371254-42c2892f0e6e", 870, "Lightweight and stylish for everyday wear", "Shoes"),
        Product {
            badge: Some(Badge::New),
            ..product(106, "Leather Tote Bag", 14999, "photo-1594531543977-171bd189f11f", 776, "Premium full-grain leather with spacious interior", "Accessories")
        },
        product(107, "Luxury Candle Set", 5999, "photo-1589365278144-c9e705f843ba", 774, "Hand-poured soy wax with essential oil fragrances", "Home Decor"),
        Product {
            original_price: Some(Price::from_cents(17999)),
            badge: Some(Badge::Sale),
            ..product(108, "Smart Fitness Watch", 12999, "photo-1541643600914-78b084683601", 848, "Track fitness, sleep and more with this stylish watch", "Accessories")
        },
        product(109, "Denim Jacket", 8999, "photo-1551537482-f2075a1d41f2", 774, "Classic denim jacket with vintage wash", "Clothing"),
        product(110, "Minimalist Backpack", 7999, "photo-1553062407-98eeb64c6a62", 774, "Stylish and functional backpack for daily use", "Accessories"),
        product(111, "Wool Blanket", 6999, "photo-1580301762395-41773e851cc2", 774, "Soft and warm premium wool blanket", "Home Decor"),
        Product {
            badge: Some(Badge::New),
            ..product(112, "Running Shoes", 11999, "photo-1608231387042-66d1773070a5", 774, "Lightweight performance running shoes", "Shoes")
        },
    ]
});

/// Every product, in display order.
#[must_use]
pub fn products() -> &'static [Product] {
    &PRODUCTS
}

fn product(
    id: i32,
    name: &str,
    cents: i64,
    photo: &str,
    width: u32,
    description: &str,
    category: &str,
) -> Product {
    Product {
        id: ItemId::new(id),
        name: name.to_string(),
        price: Price::from_cents(cents),
        image: format!("https://images.unsplash.com/{photo}?{IMAGE_PARAMS}&w={width}"),
        description: description.to_string(),
        category: category.to_string(),
        original_price: None,
        badge: None,
    }
}
