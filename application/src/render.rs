//! Terminal renderers of the search results.

use std::io;

use itertools::Itertools as _;
use serde_json::json;
use service::{
    domain::Listing,
    presentation::{Content, Emphasis, ListView, MapView, Marker, Ordinal},
};
use tracing as log;

/// [`ListView`] printing human-readable lines.
#[derive(Debug)]
pub struct TerminalList<W> {
    /// Output the lines are written into.
    out: W,
}

impl<W: io::Write> TerminalList<W> {
    /// Creates a new [`TerminalList`] writing into the provided output.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the output of this [`TerminalList`].
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Writes the provided `content`, logging a failure.
    fn write(&mut self, content: &str) {
        if let Err(e) = writeln!(self.out, "{content}") {
            log::warn!("failed to render results list: {e}");
        }
    }
}

impl<W: io::Write> ListView for TerminalList<W> {
    fn render(&mut self, content: Content<'_>) {
        let text = match content {
            Content::Loading => "loading listings...".to_owned(),
            Content::Unavailable => {
                "listings are unavailable, type `retry` to try again"
                    .to_owned()
            }
            Content::Page { info, .. } if info.total == 0 => {
                "no listings match the filters".to_owned()
            }
            Content::Page { info, entries } => {
                let header = format!(
                    "{}-{} of {} (page {}/{}{}{})",
                    info.start_ordinal,
                    info.end_ordinal,
                    info.total,
                    info.page,
                    info.page_count,
                    if info.has_previous_page() { ", prev" } else { "" },
                    if info.has_next_page() { ", next" } else { "" },
                );
                std::iter::once(header)
                    .chain(entries.iter().map(|e| {
                        format!(
                            "  {:>3}. {}",
                            usize::from(e.ordinal),
                            describe(&e.listing),
                        )
                    }))
                    .join("\n")
            }
        };
        self.write(&text);
    }

    fn emphasize(&mut self, ordinal: Ordinal, emphasis: Option<Emphasis>) {
        let text = match emphasis {
            Some(emphasis) => format!("  * {ordinal} {emphasis}"),
            None => format!("  * {ordinal} plain"),
        };
        self.write(&text);
    }
}

/// Describes the provided [`Listing`] in a single line.
fn describe(listing: &Listing) -> String {
    let prices = [
        listing
            .transaction_prices
            .sale_price
            .map(|p| format!("sale {p}")),
        listing
            .transaction_prices
            .rent_price
            .map(|p| format!("rent {p}/mo")),
    ]
    .into_iter()
    .flatten()
    .join(", ");

    let title = if listing.title.is_empty() {
        format!("listing {}", listing.id)
    } else {
        listing.title.clone()
    };

    format!(
        "{title} | {} m2 | {} | district {} | type {}",
        listing.area.normalize(),
        if prices.is_empty() { "no price" } else { prices.as_str() },
        listing.district_id,
        listing.property_type_id,
    )
}

/// [`MapView`] printing JSON lines for a map overlay to consume.
#[derive(Debug)]
pub struct JsonMap<W> {
    /// Output the JSON lines are written into.
    out: W,
}

impl<W: io::Write> JsonMap<W> {
    /// Creates a new [`JsonMap`] writing into the provided output.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the output of this [`JsonMap`].
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Writes the provided `value` as a single line.
    fn write(&mut self, value: &serde_json::Value) {
        let res = serde_json::to_writer(&mut self.out, value)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(self.out));
        if let Err(e) = res {
            log::warn!("failed to render map markers: {e}");
        }
    }
}

impl<W: io::Write> MapView for JsonMap<W> {
    fn render(&mut self, markers: &[Marker]) {
        let markers = markers
            .iter()
            .map(|m| {
                json!({
                    "ordinal": usize::from(m.ordinal),
                    "id": m.listing.id,
                    "lat": m.location.latitude,
                    "lng": m.location.longitude,
                })
            })
            .collect::<Vec<_>>();
        self.write(&json!({ "markers": markers }));
    }

    fn emphasize(&mut self, ordinal: Ordinal, emphasis: Option<Emphasis>) {
        self.write(&json!({
            "marker": usize::from(ordinal),
            "emphasis": emphasis,
        }));
    }
}
