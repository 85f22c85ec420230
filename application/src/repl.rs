//! Read-eval-print loop driving a search session.

use std::{convert::Infallible, io};

use itertools::Itertools as _;
use service::{
    command::RunEffects,
    controller::{CatalogState, Controller},
    filter::share,
    presentation::{ListView, MapView},
    task::debounce,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt as _},
    time::{self, Instant},
};
use tracing as log;

use crate::command::{Command, HELP};

/// Runs the loop reading [`Command`]s from the provided `input` until it's
/// exhausted or [`Command::Quit`] is entered.
///
/// Debounced evaluations of the [`Controller`] are fired while waiting for
/// the next line, and the pending one is awaited once the `input` is
/// exhausted.
///
/// # Errors
///
/// If reading the `input` or writing the `out` fails.
pub async fn run<S, L, M>(
    svc: &S,
    controller: &mut Controller<L, M>,
    input: impl AsyncBufRead + Unpin,
    mut out: impl io::Write,
) -> io::Result<()>
where
    S: for<'c> service::Command<
        RunEffects<'c, L, M>,
        Ok = (),
        Err = Infallible,
    >,
    L: ListView,
    M: MapView,
{
    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = debounce::until(controller.deadline()) => {
                if controller.fire(Instant::now()) {
                    log::debug!("debounced evaluation fired");
                }
                continue;
            }
        };
        let Some(line) = line else {
            if let Some(deadline) = controller.deadline() {
                time::sleep_until(deadline).await;
                _ = controller.fire(Instant::now());
            }
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Event(event)) => {
                log::debug!(?event, "handling event");
                let effects = controller.handle(event);
                svc.execute(RunEffects {
                    controller: &mut *controller,
                    effects,
                })
                .await
                .unwrap_or_else(|e| match e {});
            }
            Ok(Command::Help) => writeln!(out, "{HELP}")?,
            Ok(Command::State) => describe_state(controller, &mut out)?,
            Ok(Command::Facets) => describe_facets(controller, &mut out)?,
            Ok(Command::Share) => writeln!(
                out,
                "?{}",
                share::to_query(&controller.state().generic),
            )?,
            Ok(Command::Quit) => break,
            Err(e) => writeln!(out, "{e}")?,
        }
    }
    Ok(())
}

/// Writes the current filters of the provided [`Controller`] along with the
/// visible basic fields and active advanced entries per category.
fn describe_state<L, M>(
    controller: &Controller<L, M>,
    out: &mut impl io::Write,
) -> io::Result<()>
where
    L: ListView,
    M: MapView,
{
    let state = controller.state();
    let json = serde_json::to_string_pretty(state).map_err(io::Error::from)?;
    writeln!(out, "{json}")?;
    writeln!(out, "visible: {}", state.basic.visible_fields().join(", "))?;
    if state.advanced.is_active() {
        writeln!(
            out,
            "advanced: {}",
            state
                .advanced
                .counts()
                .map(|(code, n)| format!("{code} {n}"))
                .join(", "),
        )?;
    }
    writeln!(
        out,
        "{} active, page {}",
        state.active_count(),
        controller.page(),
    )
}

/// Writes the advanced facets available in the loaded catalog of the
/// provided [`Controller`].
fn describe_facets<L, M>(
    controller: &Controller<L, M>,
    out: &mut impl io::Write,
) -> io::Result<()>
where
    L: ListView,
    M: MapView,
{
    let index = match controller.catalog() {
        CatalogState::Loading => return writeln!(out, "catalog is loading"),
        CatalogState::Unavailable => {
            return writeln!(out, "catalog is unavailable, type `retry`");
        }
        CatalogState::Available(index) => index,
    };
    if index.has_no_facets() {
        return writeln!(out, "no advanced facets for this property type");
    }

    let advanced = &controller.state().advanced;
    for category in index.categories_ordered() {
        let active = advanced.active_count(&category.code);
        writeln!(
            out,
            "{} [{}]{}",
            category.name,
            category.code,
            if active > 0 {
                format!(" ({active} active)")
            } else {
                String::new()
            },
        )?;
        writeln!(
            out,
            "  {}",
            category
                .characteristics
                .iter()
                .map(|c| format!("{} {} ({})", c.id, c.name, c.input_kind))
                .join(", "),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use service::{
        command::OpenSession,
        domain::{
            characteristic::{Category, CategoryCode, Characteristic, InputKind},
            listing, Catalog, Listing,
        },
        infra::Memory,
        Command as _, Config, Service,
    };

    use crate::render::{JsonMap, TerminalList};

    use super::run;

    fn listing(id: u64, district: u32) -> Listing {
        Listing {
            id: listing::Id::from(id),
            title: format!("Flat {id}"),
            latitude: None,
            longitude: None,
            area: Decimal::from(60),
            transaction_prices: listing::Prices {
                sale_price: Some(Decimal::from(90_000)),
                rent_price: None,
            },
            property_type_id: 1.into(),
            district_id: district.into(),
            age_years: 10,
            parking_count: 0,
            finish_level: None,
            characteristics: listing::Characteristics::default(),
        }
    }

    fn catalog() -> Catalog {
        let code = CategoryCode::new("AMENITIES").unwrap();
        Catalog {
            categories: vec![Category {
                code: code.clone(),
                name: "Amenities".to_owned(),
                order: 1,
                characteristics: vec![Characteristic {
                    id: 42.into(),
                    name: "Pool".to_owned(),
                    category_code: code,
                    input_kind: InputKind::Presence,
                    unit: None,
                }],
            }],
            ..Catalog::default()
        }
    }

    async fn session(script: &str) -> (String, String) {
        let svc = Service::new(
            Config {
                debounce: Duration::from_millis(300),
                session_key: None,
                ..Config::default()
            },
            Memory::default()
                .with_catalog(catalog())
                .with_listings([listing(1, 1), listing(2, 2)]),
        );
        let mut controller = svc
            .execute(OpenSession {
                list: TerminalList::new(Vec::new()),
                map: JsonMap::new(Vec::new()),
                viewport_width: 1280,
                shared: None,
                fresh: true,
            })
            .await
            .unwrap();

        let mut out = Vec::new();
        run(&svc, &mut controller, script.as_bytes(), &mut out)
            .await
            .unwrap();

        let list = controller.presenter().list().get_ref().clone();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(list).unwrap(),
        )
    }

    #[tokio::test]
    async fn filters_and_shares() {
        let (out, list) = session("district 2\nshare\nquit\nshare\n").await;

        assert_eq!(out, "?district=2\n");
        assert!(list.ends_with("1-1 of 1 (page 1/1)\n    1. Flat 2 | 60 m2 | \
                                sale 90000 | district 2 | type 1\n"));
    }

    #[tokio::test]
    async fn reports_malformed_lines_and_continues() {
        let (out, _) = session("fly\n\npage x\nfacets\n").await;

        assert_eq!(
            out,
            "unknown command `fly`, type `help` for the list\n\
             `x` is not a valid argument of `page`\n\
             Amenities [AMENITIES]\n  \
             42 Pool (presence)\n",
        );
    }

    #[tokio::test]
    async fn describes_visible_fields_and_categories() {
        let (out, _) = session("basic-transaction rent\nstate\n").await;
        assert!(out.contains(
            "visible: max_rent_price, min_area, min_parking, max_age_years, \
             finish_level\n",
        ));
        assert!(!out.contains("advanced:"));

        let (out, _) = session("presence AMENITIES 42\nstate\n").await;
        assert!(out.contains("advanced: AMENITIES 1\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn fires_debounced_evaluation() {
        let (_, list) = session("set target_area 10\n").await;

        assert!(list.ends_with("no listings match the filters\n"));
    }
}
