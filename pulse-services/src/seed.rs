//! Built-in articles used when nothing could be fetched and the store is empty

use pulse_news::RawArticle;

const SEED: &[(&str, &str, &str)] = &[
    (
        "Market Wire",
        "Stocks rally as Fed signals rate cut is on the table",
        "Treasury yields fell and the S&P 500 climbed 1.2% after policymakers pointed to easing inflation.",
    ),
    (
        "Market Wire",
        "Nvidia shares jump on record data center revenue",
        "NVDA beat analyst estimates as AI chip demand stayed strong through the quarter.",
    ),
    (
        "Energy Desk",
        "Oil prices slump as OPEC output rises",
        "Brent crude dropped 3% on concerns that supply will outpace demand.",
    ),
    (
        "Crypto Desk",
        "Bitcoin climbs past $70,000 as ETF inflows surge",
        "BTC and ETH gained as crypto investors returned to spot funds.",
    ),
    (
        "Health Desk",
        "FDA approval lifts biotech shares",
        "A successful clinical trial for a new therapy sent drugmaker stocks higher.",
    ),
    (
        "Consumer Desk",
        "Retail spending slows as consumers pull back",
        "Walmart and Target warn of weaker demand heading into holiday sales.",
    ),
    (
        "Market Wire",
        "Bank stocks steady ahead of earnings",
        "JPM and GS report next week; investors expect solid loan growth.",
    ),
    (
        "Industrial Desk",
        "Boeing deliveries decline amid supply chain concerns",
        "The aerospace manufacturer cut its production outlook for the year.",
    ),
    (
        "Housing Desk",
        "Housing starts rebound as mortgage rates ease",
        "Homebuilders gained after new home sales beat forecasts.",
    ),
    (
        "Market Wire",
        "Gold hits all-time high on safe-haven demand",
        "Copper and silver also rose as the dollar weakened.",
    ),
];

/// Fixed raw articles that pass through the normal scoring path
pub fn seed_articles() -> Vec<RawArticle> {
    SEED.iter()
        .map(|(source, title, description)| {
            RawArticle::new(source, title).with_description(description)
        })
        .collect()
}
