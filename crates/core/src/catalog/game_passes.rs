//! Game pass table.

use std::sync::LazyLock;

use super::GamePass;
use crate::types::{Badge, GamePassCategory, GamePassStatus, ItemId, Platform, Price};

static GAME_PASSES: LazyLock<Vec<GamePass>> = LazyLock::new(|| {
    vec![
        GamePass {
            id: ItemId::new(1),
            name: "Dusk - Early Access".to_string(),
            price: Price::ZERO,
            price_display: "Coming Soon".to_string(),
            image: "https://images.unsplash.com/photo-1518709268805-4e9042af9f23?q=80&w=1769&auto=format&fit=crop".to_string(),
            description: "A horror survival game where players complete tasks to earn coins and reduce time, while evading a relentless killer. Compatibility: Desktop/ChromeBook.".to_string(),
            category: GamePassCategory::Dusk,
            platform: Platform::Scratch,
            external_id: None,
            external_link: Some("https://scratch.mit.edu/users/coolcats153122/".to_string()),
            badge: Some(Badge::ComingSoon),
            status: GamePassStatus::ComingSoon,
            rating: None,
        },
        donation(
            3,
            "Basic",
            25,
            "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?q=80&w=1964&auto=format&fit=crop",
            "Support development with 25 Robux. Receive a special thank you badge on your profile.",
            "956035778",
            Badge::Popular,
        ),
        donation(
            4,
            "Bronze",
            50,
            "https://images.unsplash.com/photo-1614521184900-ad9ec0e942c9?q=80&w=1854&auto=format&fit=crop",
            "Support with 50 Robux. Get a special chat color and exclusive updates on upcoming features.",
            "956001905",
            Badge::New,
        ),
        donation(
            5,
            "Silver",
            75,
            "https://images.unsplash.com/photo-1626285869432-b1c473c8d824?q=80&w=1974&auto=format&fit=crop",
            "Support with 75 Robux. Includes all perks from lower tiers plus a custom in-game accessory.",
            "955696205",
            Badge::Sale,
        ),
        donation(
            6,
            "Gold",
            100,
            "https://images.unsplash.com/photo-1598517511194-186087f54f58?q=80&w=1852&auto=format&fit=crop",
            "Support with 100 Robux. Includes exclusive perks and monthly virtual meetups.",
            "955586153",
            Badge::Popular,
        ),
        donation(
            7,
            "Platinum",
            125,
            "https://images.unsplash.com/photo-1599707367072-cd6ada2bc375?q=80&w=1933&auto=format&fit=crop",
            "Support with 125 Robux. Premium support tier with special recognition.",
            "955937844",
            Badge::Sale,
        ),
        donation(
            8,
            "Diamond",
            150,
            "https://images.unsplash.com/photo-1624395213232-ea2bcd36b865?q=80&w=1974&auto=format&fit=crop",
            "Support with 150 Robux. Elite supporter status with all available perks.",
            "955748081",
            Badge::Popular,
        ),
        donation(
            9,
            "Ultimate",
            175,
            "https://images.unsplash.com/photo-1631285562800-10e82c1f6ce6?q=80&w=1974&auto=format&fit=crop",
            "Support with 175 Robux. Ultimate supporter tier with exclusive developer contact.",
            "956165001",
            Badge::New,
        ),
    ]
});

/// Every game pass, in display order.
#[must_use]
pub fn game_passes() -> &'static [GamePass] {
    &GAME_PASSES
}

/// Active Roblox donation tier; the external link is derived from the pass id.
fn donation(
    id: i32,
    tier: &str,
    robux: i64,
    image: &str,
    description: &str,
    external_id: &str,
    badge: Badge,
) -> GamePass {
    GamePass {
        id: ItemId::new(id),
        name: format!("Donation - {tier}"),
        price: Price::whole(robux),
        price_display: format!("{robux} RS"),
        image: image.to_string(),
        description: description.to_string(),
        category: GamePassCategory::Donation,
        platform: Platform::Roblox,
        external_id: Some(external_id.to_string()),
        external_link: Some(format!("https://www.roblox.com/game-pass/{external_id}")),
        badge: Some(badge),
        status: GamePassStatus::Active,
        rating: None,
    }
}
