//! Predicate Engine compiling a [`FilterState`] into a single boolean
//! [`Predicate`] over [`Listing`]s.

use std::{collections::BTreeSet, ops::RangeInclusive, sync::Arc};

use common::{pagination, PageSize, Percent, Window};
use derive_more::Deref;
use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use tracing as log;

use crate::{
    domain::{
        catalog::{DistrictId, PropertyTypeId},
        characteristic,
        listing::{FinishLevel, Transaction},
        Listing,
    },
    filter::{AdvancedFilter, BasicFilter, FilterState, GenericFilter},
};

/// Tolerance band of the generic numeric targets and of the basic minimal
/// area.
pub const AREA_TOLERANCE: Percent = Percent::whole(15);

/// Tolerance band of the generic budget target.
pub const BUDGET_TOLERANCE: Percent = Percent::whole(15);

/// Tolerance of the basic minimal parking places, applied to the lower bound
/// only.
pub const PARKING_TOLERANCE: Percent = Percent::whole(20);

/// Evaluates whether the provided [`Listing`] satisfies the provided
/// [`FilterState`].
#[must_use]
pub fn evaluate(listing: &Listing, state: &FilterState) -> bool {
    Predicate::compile(state).matches(listing)
}

/// Filters the provided `listings` by the provided [`FilterState`], keeping
/// their original order.
#[must_use]
pub fn filter(listings: &[Arc<Listing>], state: &FilterState) -> ResultSet {
    Predicate::compile(state).filter(listings)
}

/// Compiled conjunction of [`Constraint`]s of all the [`FilterState`]
/// layers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Predicate {
    /// [`Constraint`]s a [`Listing`] must satisfy all together.
    constraints: Vec<Constraint>,
}

impl Predicate {
    /// Compiles the provided [`FilterState`] into a [`Predicate`].
    #[must_use]
    pub fn compile(state: &FilterState) -> Self {
        let mut constraints = Vec::new();
        compile_generic(&state.generic, &mut constraints);
        compile_basic(&state.basic, &mut constraints);
        compile_advanced(&state.advanced, &mut constraints);
        Self { constraints }
    }

    /// Indicates whether this [`Predicate`] lets every [`Listing`] through.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Returns [`Constraint`]s of this [`Predicate`].
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Evaluates this [`Predicate`] over the provided [`Listing`].
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        self.constraints.iter().all(|c| c.matches(listing))
    }

    /// Applies this [`Predicate`] to the provided `listings`, keeping their
    /// original order.
    #[must_use]
    pub fn filter(&self, listings: &[Arc<Listing>]) -> ResultSet {
        let matched = listings
            .iter()
            .filter(|l| self.matches(l))
            .cloned()
            .collect::<Vec<_>>();
        log::debug!(
            constraints = self.constraints.len(),
            inventory = listings.len(),
            matched = matched.len(),
            "filtered listings",
        );
        ResultSet(matched)
    }
}

/// Single constraint over a [`Listing`].
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// Property type must be exactly the provided one.
    PropertyType(PropertyTypeId),

    /// District must be one of the provided ones.
    District(BTreeSet<DistrictId>),

    /// Area must fall into the provided inclusive band.
    Area(RangeInclusive<Decimal>),

    /// Price must fall into the provided inclusive band.
    Budget {
        /// [`Transaction`] selecting the price, or [`None`] to accept any of
        /// the prices.
        transaction: Option<Transaction>,

        /// Inclusive band of acceptable prices.
        band: RangeInclusive<Decimal>,
    },

    /// Price must not exceed the provided cap.
    MaxPrice {
        /// [`Transaction`] selecting the price.
        transaction: Transaction,

        /// Highest acceptable price.
        cap: Decimal,
    },

    /// Parking places count must be at least the provided one.
    MinParking(u16),

    /// Building age must be below the provided one.
    MaxAgeYears(u16),

    /// Finish level must be exactly the provided one.
    FinishLevel(FinishLevel),

    /// Characteristic must be recorded, satisfying the provided requirement.
    Characteristic {
        /// ID of the required characteristic.
        id: characteristic::Id,

        /// Presence, or the lowest acceptable amount.
        requirement: characteristic::Value,
    },
}

impl Constraint {
    /// Evaluates this [`Constraint`] over the provided [`Listing`].
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Self::PropertyType(id) => listing.property_type_id == *id,
            Self::District(ids) => ids.contains(&listing.district_id),
            Self::Area(band) => band.contains(&listing.area),
            Self::Budget {
                transaction: Some(t),
                band,
            } => listing
                .transaction_prices
                .for_transaction(*t)
                .is_some_and(|p| band.contains(&p)),
            Self::Budget {
                transaction: None,
                band,
            } => Transaction::ALL.iter().any(|t| {
                listing
                    .transaction_prices
                    .for_transaction(*t)
                    .is_some_and(|p| band.contains(&p))
            }),
            Self::MaxPrice { transaction, cap } => listing
                .transaction_prices
                .for_transaction(*transaction)
                .is_some_and(|p| p <= *cap),
            Self::MinParking(min) => listing.parking_count >= *min,
            Self::MaxAgeYears(max) => listing.age_years < *max,
            Self::FinishLevel(level) => {
                listing.finish_level.as_ref() == Some(level)
            }
            Self::Characteristic { id, requirement } => {
                match (listing.characteristics.get(*id), requirement) {
                    (Some(_), characteristic::Value::Presence) => true,
                    (
                        Some(characteristic::Value::Numeric(recorded)),
                        characteristic::Value::Numeric(floor),
                    ) => recorded >= *floor,
                    (
                        None | Some(characteristic::Value::Presence),
                        characteristic::Value::Numeric(_),
                    )
                    | (None, characteristic::Value::Presence) => false,
                }
            }
        }
    }
}

/// Returns the lowest acceptable parking places count for the requested
/// `target`: the lower bound of its tolerance band, rounded in favor of the
/// `target`.
///
/// Listings with more parking places than requested are always acceptable.
#[must_use]
pub fn parking_lower_bound(target: u16) -> u16 {
    let slack = PARKING_TOLERANCE
        .of(Decimal::from(target))
        .ceil()
        .to_u16()
        .unwrap_or(target);
    target.saturating_sub(slack)
}

/// Compiles [`GenericFilter`] into [`Constraint`]s.
fn compile_generic(generic: &GenericFilter, out: &mut Vec<Constraint>) {
    let GenericFilter {
        property_type_id,
        district_ids,
        transaction,
        target_area,
        target_budget,
    } = generic;

    if let Some(id) = property_type_id {
        out.push(Constraint::PropertyType(*id));
    }
    if !district_ids.is_empty() {
        out.push(Constraint::District(district_ids.clone()));
    }
    if let Some(band) = target_area.and_then(|a| AREA_TOLERANCE.band(a)) {
        out.push(Constraint::Area(band));
    }
    if let Some(band) = target_budget.and_then(|b| BUDGET_TOLERANCE.band(b)) {
        out.push(Constraint::Budget {
            transaction: *transaction,
            band,
        });
    }
}

/// Compiles [`BasicFilter`] into [`Constraint`]s.
fn compile_basic(basic: &BasicFilter, out: &mut Vec<Constraint>) {
    if let Some(cap) = basic.effective_max_sale_price() {
        out.push(Constraint::MaxPrice {
            transaction: Transaction::Buy,
            cap,
        });
    }
    if let Some(cap) = basic.effective_max_rent_price() {
        out.push(Constraint::MaxPrice {
            transaction: Transaction::Rent,
            cap,
        });
    }
    if let Some(band) = basic.min_area.and_then(|a| AREA_TOLERANCE.band(a)) {
        out.push(Constraint::Area(band));
    }
    if let Some(parking) = basic.min_parking {
        out.push(Constraint::MinParking(parking_lower_bound(parking)));
    }
    if let Some(age) = basic.max_age_years {
        out.push(Constraint::MaxAgeYears(age));
    }
    if let Some(level) = &basic.finish_level {
        out.push(Constraint::FinishLevel(level.clone()));
    }
}

/// Compiles [`AdvancedFilter`] into [`Constraint`]s.
fn compile_advanced(advanced: &AdvancedFilter, out: &mut Vec<Constraint>) {
    out.extend(advanced.entries().map(|(_, id, requirement)| {
        Constraint::Characteristic { id, requirement }
    }));
}

/// Ordered subset of [`Listing`]s satisfying a [`Predicate`].
#[derive(Clone, Debug, Default, Deref)]
pub struct ResultSet(Vec<Arc<Listing>>);

impl ResultSet {
    /// Returns the requested page of this [`ResultSet`].
    #[must_use]
    pub fn paginate(
        &self,
        size: PageSize,
        page: usize,
    ) -> Window<'_, Arc<Listing>> {
        pagination::paginate(&self.0, size, page)
    }
}

#[cfg(test)]
mod spec {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use crate::{
        domain::{
            characteristic::Value,
            listing::{FinishLevel, Transaction},
            Listing,
        },
        filter::{FilterState, Patch},
        index::{catalog::spec::code, inventory::spec::listing},
    };

    use super::{evaluate, filter, parking_lower_bound, Predicate};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn state(patches: impl IntoIterator<Item = Patch>) -> FilterState {
        let mut state = FilterState::default();
        for p in patches {
            _ = state.apply(p);
        }
        state
    }

    fn with_area(area: &str) -> Listing {
        let mut l = listing(1);
        l.area = decimal(area);
        l
    }

    fn ids(listings: &[Arc<Listing>]) -> Vec<u64> {
        listings.iter().map(|l| u64::from(l.id)).collect()
    }

    #[test]
    fn generic_area_band_is_inclusive() {
        let s = state([Patch::TargetArea(Some(decimal("100")))]);

        assert!(evaluate(&with_area("100"), &s));
        assert!(evaluate(&with_area("115"), &s));
        assert!(evaluate(&with_area("85"), &s));
        assert!(!evaluate(&with_area("116"), &s));
        assert!(!evaluate(&with_area("84"), &s));
        assert!(!evaluate(&with_area("115.01"), &s));
    }

    #[test]
    fn tolerance_band_holds_for_any_target() {
        for target in ["1", "37.5", "80", "333", "1250.75"] {
            let target = decimal(target);
            let s = state([Patch::TargetArea(Some(target))]);
            let low = target * decimal("0.85");
            let high = target * decimal("1.15");

            assert!(evaluate(&with_area(&target.to_string()), &s));
            assert!(evaluate(&with_area(&low.to_string()), &s));
            assert!(evaluate(&with_area(&high.to_string()), &s));
            let above = (high + Decimal::ONE).to_string();
            let below = (low - Decimal::ONE).to_string();
            assert!(!evaluate(&with_area(&above), &s));
            assert!(!evaluate(&with_area(&below), &s));
        }
    }

    #[test]
    fn budget_follows_transaction() {
        let mut sale_only = listing(1);
        sale_only.transaction_prices.rent_price = None;

        let buy = state([
            Patch::GenericTransaction(Some(Transaction::Buy)),
            Patch::TargetBudget(Some(decimal("180000"))),
        ]);
        assert!(evaluate(&sale_only, &buy));

        let rent = state([
            Patch::GenericTransaction(Some(Transaction::Rent)),
            Patch::TargetBudget(Some(decimal("1000"))),
        ]);
        assert!(!evaluate(&sale_only, &rent));
        assert!(evaluate(&listing(2), &rent));

        let any = state([Patch::TargetBudget(Some(decimal("1100")))]);
        assert!(evaluate(&listing(3), &any));
        assert!(!evaluate(&sale_only, &any));
    }

    #[test]
    fn transaction_alone_is_neutral() {
        let s = state([
            Patch::GenericTransaction(Some(Transaction::Rent)),
            Patch::BasicTransaction(Some(Transaction::Rent)),
        ]);

        assert!(Predicate::compile(&s).is_neutral());
    }

    #[test]
    fn generic_scalars_match_exactly() {
        let mut other = listing(2);
        other.property_type_id = 2.into();
        other.district_id = 3.into();

        let by_type = state([Patch::PropertyType(Some(1.into()))]);
        assert!(evaluate(&listing(1), &by_type));
        assert!(!evaluate(&other, &by_type));

        let by_district = state([
            Patch::ToggleDistrict(3.into()),
            Patch::ToggleDistrict(4.into()),
        ]);
        assert!(evaluate(&other, &by_district));
        assert!(!evaluate(&listing(1), &by_district));
    }

    #[test]
    fn basic_caps_are_inclusive() {
        let s = state([
            Patch::BasicTransaction(Some(Transaction::Buy)),
            Patch::MaxSalePrice(Some(decimal("200000"))),
            Patch::MaxRentPrice(Some(decimal("1"))),
        ]);
        assert!(evaluate(&listing(1), &s));

        let mut pricey = listing(2);
        pricey.transaction_prices.sale_price = Some(decimal("200000.01"));
        assert!(!evaluate(&pricey, &s));

        let mut unpriced = listing(3);
        unpriced.transaction_prices.sale_price = None;
        assert!(!evaluate(&unpriced, &s));
    }

    #[test]
    fn basic_min_area_is_two_sided() {
        let s = state([Patch::MinArea(Some(decimal("80")))]);

        assert!(evaluate(&with_area("92"), &s));
        assert!(evaluate(&with_area("68"), &s));
        assert!(!evaluate(&with_area("92.01"), &s));
        assert!(!evaluate(&with_area("67.99"), &s));
    }

    /// Extra parking is intentionally acceptable: only the lower side of the
    /// tolerance band applies, unlike the two-sided minimal area band.
    #[test]
    fn min_parking_accepts_more_than_requested() {
        assert_eq!(parking_lower_bound(1), 0);
        assert_eq!(parking_lower_bound(3), 2);
        assert_eq!(parking_lower_bound(5), 4);
        assert_eq!(parking_lower_bound(6), 4);
        assert_eq!(parking_lower_bound(10), 8);

        let s = state([Patch::MinParking(Some(5))]);
        let parked = |count| {
            let mut l = listing(1);
            l.parking_count = count;
            l
        };
        assert!(evaluate(&parked(4), &s));
        assert!(evaluate(&parked(40), &s));
        assert!(!evaluate(&parked(3), &s));
    }

    #[test]
    fn max_age_and_finish_level() {
        let s = state([
            Patch::MaxAgeYears(Some(5)),
            Patch::FinishLevel(FinishLevel::new("turnkey")),
        ]);

        let mut l = listing(1);
        l.age_years = 4;
        assert!(!evaluate(&l, &s));

        l.finish_level = FinishLevel::new("turnkey");
        assert!(evaluate(&l, &s));

        l.age_years = 6;
        assert!(!evaluate(&l, &s));
    }

    #[test]
    fn overflowing_bands_constrain_nothing() {
        let s = state([
            Patch::TargetArea(Some(Decimal::MAX)),
            Patch::TargetBudget(Some(Decimal::MAX)),
            Patch::MinArea(Some(Decimal::MAX)),
        ]);

        assert!(Predicate::compile(&s).is_neutral());
        assert!(evaluate(&listing(1), &s));
    }

    #[test]
    fn max_age_is_strict() {
        let s = state([Patch::MaxAgeYears(Some(5))]);
        let mut l = listing(1);

        l.age_years = 5;
        assert!(!evaluate(&l, &s));

        l.age_years = 4;
        assert!(evaluate(&l, &s));

        l.age_years = 0;
        assert!(!evaluate(&l, &state([Patch::MaxAgeYears(Some(0))])));
    }

    #[test]
    fn advanced_requires_recorded_characteristic() {
        let s = state([Patch::Floor {
            category: code("PARKING"),
            characteristic: 42.into(),
            floor: Some(decimal("2")),
        }]);

        assert!(!evaluate(&listing(1), &s));

        let mut l = listing(2);
        l.characteristics = [(42.into(), Value::Numeric(decimal("1")))]
            .into_iter()
            .collect();
        assert!(!evaluate(&l, &s));

        l.characteristics = [(42.into(), Value::Numeric(decimal("2")))]
            .into_iter()
            .collect();
        assert!(evaluate(&l, &s));

        l.characteristics =
            [(42.into(), Value::Presence)].into_iter().collect();
        assert!(!evaluate(&l, &s));
    }

    #[test]
    fn advanced_presence_needs_existence_only() {
        let s = state([Patch::TogglePresence {
            category: code("AMENITIES"),
            characteristic: 5.into(),
        }]);

        let mut l = listing(1);
        assert!(!evaluate(&l, &s));

        l.characteristics = [(5.into(), Value::Numeric(Decimal::ZERO))]
            .into_iter()
            .collect();
        assert!(evaluate(&l, &s));
    }

    #[test]
    fn empty_state_passes_everything_in_order() {
        let mut odd = listing(9);
        odd.latitude = None;
        odd.transaction_prices = Default::default();
        odd.finish_level = None;
        let listings = [listing(3), odd, listing(1)].map(Arc::new);

        let result = filter(&listings, &FilterState::default());

        assert_eq!(ids(&result), [3, 9, 1]);
    }

    #[test]
    fn layers_compose_with_and() {
        let mut big = listing(2);
        big.area = decimal("200");
        let mut far = listing(3);
        far.district_id = 5.into();
        let listings = [listing(1), big, far].map(Arc::new);

        let generic = state([Patch::ToggleDistrict(1.into())]);
        let basic = state([Patch::MinArea(Some(decimal("100")))]);
        let both = state([
            Patch::ToggleDistrict(1.into()),
            Patch::MinArea(Some(decimal("100"))),
        ]);

        assert_eq!(ids(&filter(&listings, &generic)), [1, 2]);
        assert_eq!(ids(&filter(&listings, &basic)), [1, 3]);
        assert_eq!(ids(&filter(&listings, &both)), [1]);
    }

    #[test]
    fn paginates_result_set() {
        let listings = (1..=23).map(listing).map(Arc::new).collect::<Vec<_>>();
        let result = filter(&listings, &FilterState::default());

        let window = result.paginate(common::PageSize::REGULAR, 3);

        assert_eq!(window.items.len(), 3);
        assert_eq!(window.start_ordinal, 21);
        assert_eq!(window.end_ordinal, 23);
    }
}
