//! Named groups of indicators updated together from one tick stream.

use crate::{
    AnyIndicator, Category, ConstructionError, IndicatorKind, IndicatorValue, InputError, Params,
    Schema, Tick,
};

use std::{collections::BTreeMap, fmt::Display, sync::Arc};
use tracing::{debug, trace};

#[derive(Clone, Debug)]
struct Member {
    name: Arc<str>,
    indicator: AnyIndicator,
}

/// Ordered `name → indicator` collection fed from a single tick stream.
///
/// A tick is first checked against the group's
/// [`tick_schema`](Self::tick_schema): the fields every member reads, or
/// the stream schema declared with
/// [`StrategyGroupBuilder::tick_schema`]. A tick failing that check is
/// rejected before any member advances. Past it, each member validates
/// the tick on its own, so close-only ticks still advance close-only
/// members while the rest record a [`MemberFailure`].
///
/// # Example
///
/// ```
/// use quantedge_stream::{Category, StrategyGroup, Tick};
///
/// let mut group = StrategyGroup::builder(Category::Trend)
///     .param("window", 10.0)
///     .build()
///     .unwrap();
///
/// for i in 0..30 {
///     let close = 100.0 + f64::from(i);
///     group.update(&Tick::hlc(close + 1.0, close - 1.0, close)).unwrap();
/// }
///
/// assert!(group.indicator("sma").unwrap().is_ready());
/// assert_eq!(group.names().next(), Some("sma"));
/// ```
#[derive(Clone, Debug)]
pub struct StrategyGroup {
    members: Vec<Member>,
    schema: Schema,
    tick_schema: Schema,
}

impl StrategyGroup {
    /// Every member of `category` with default parameters, in canonical
    /// order.
    #[must_use]
    pub fn new(category: Category) -> Self {
        let members = category
            .members()
            .map(|kind| Member {
                name: kind.to_string().into(),
                indicator: AnyIndicator::new(kind),
            })
            .collect();

        Self::from_members(members, None)
    }

    /// [`new`](Self::new) for a category given by name, ASCII
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// [`ConstructionError::UnknownCategory`] if `name` is not a category.
    pub fn for_category(name: &str) -> Result<Self, ConstructionError> {
        let category = name
            .parse::<Category>()
            .map_err(|_| ConstructionError::UnknownCategory(name.to_owned()))?;
        Ok(Self::new(category))
    }

    /// Builder over the members of `category`, accepting parameter
    /// overrides.
    #[must_use]
    pub fn builder(category: Category) -> StrategyGroupBuilder {
        StrategyGroupBuilder {
            category: Some(category),
            ..StrategyGroupBuilder::default()
        }
    }

    /// Builder for a custom group assembled with
    /// [`add`](StrategyGroupBuilder::add).
    #[must_use]
    pub fn builder_empty() -> StrategyGroupBuilder {
        StrategyGroupBuilder::default()
    }

    fn from_members(members: Vec<Member>, declared: Option<Schema>) -> Self {
        let schema = members
            .iter()
            .fold(Schema::EMPTY, |schema, member| {
                schema.union(member.indicator.schema())
            });
        let tick_schema = declared.unwrap_or_else(|| {
            members
                .iter()
                .map(|member| member.indicator.schema())
                .reduce(Schema::intersection)
                .unwrap_or(Schema::EMPTY)
        });

        debug!(
            members = members.len(),
            %schema,
            %tick_schema,
            "built strategy group"
        );

        Self {
            members,
            schema,
            tick_schema,
        }
    }

    /// Feeds one tick to every member.
    ///
    /// Members that reject the tick keep their previous state and are
    /// listed in [`TickReport::failures`]; the others advance.
    ///
    /// # Errors
    ///
    /// [`InputError`] if the tick does not satisfy the group's
    /// [`tick_schema`](Self::tick_schema). No member advances in that case.
    pub fn update(&mut self, tick: &Tick) -> Result<TickReport, InputError> {
        self.tick_schema.validate(tick)?;

        let mut report = TickReport {
            values: Vec::with_capacity(self.members.len()),
            failures: Vec::new(),
        };

        for member in &mut self.members {
            let value = match member.indicator.update(tick) {
                Ok(value) => value,
                Err(error) => {
                    trace!(member = %member.name, %error, "strategy member rejected tick");
                    report.failures.push(MemberFailure {
                        name: Arc::clone(&member.name),
                        error,
                    });
                    member.indicator.value()
                }
            };
            report.values.push((Arc::clone(&member.name), value));
        }

        Ok(report)
    }

    /// Last value of every member, in construction order.
    #[must_use]
    pub fn current_values(&self) -> Vec<(&str, Option<IndicatorValue>)> {
        self.members
            .iter()
            .map(|member| (&*member.name, member.indicator.value()))
            .collect()
    }

    /// Readiness of every member, in construction order.
    #[must_use]
    pub fn ready_status(&self) -> Vec<(&str, bool)> {
        self.members
            .iter()
            .map(|member| (&*member.name, member.indicator.is_ready()))
            .collect()
    }

    #[must_use]
    pub fn all_ready(&self) -> bool {
        self.members.iter().all(|member| member.indicator.is_ready())
    }

    pub fn reset_all(&mut self) {
        for member in &mut self.members {
            member.indicator.reset();
        }
    }

    #[must_use]
    pub fn indicator(&self, name: &str) -> Option<&AnyIndicator> {
        self.members
            .iter()
            .find(|member| &*member.name == name)
            .map(|member| &member.indicator)
    }

    /// Member names in construction order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member| &*member.name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Union of the members' schemas: what a tick needs for every member
    /// to advance.
    #[must_use]
    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Fields checked once per tick before any member is updated.
    #[must_use]
    pub fn tick_schema(&self) -> Schema {
        self.tick_schema
    }
}

impl Display for StrategyGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StrategyGroup[")?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", member.name, member.indicator)?;
        }
        f.write_str("]")
    }
}

/// Builder for a [`StrategyGroup`].
///
/// Errors are collected and reported by [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct StrategyGroupBuilder {
    category: Option<Category>,
    global: Params,
    overrides: BTreeMap<String, Params>,
    extra: Vec<(String, AnyIndicator)>,
    tick_schema: Option<Schema>,
}

impl StrategyGroupBuilder {
    /// Overrides `name` on every category member that has such a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.global.set(name, value);
        self
    }

    /// Overrides `name` on the category member `indicator` only. Takes
    /// precedence over [`param`](Self::param).
    #[must_use]
    pub fn param_for(
        mut self,
        indicator: impl Into<String>,
        name: impl Into<String>,
        value: f64,
    ) -> Self {
        self.overrides
            .entry(indicator.into())
            .or_default()
            .set(name, value);
        self
    }

    /// Declares the schema of the tick stream. Ticks not satisfying it
    /// are rejected by [`StrategyGroup::update`] as a whole.
    #[must_use]
    pub fn tick_schema(mut self, schema: Schema) -> Self {
        self.tick_schema = Some(schema);
        self
    }

    /// Appends a member after the category members.
    #[must_use]
    pub fn add(mut self, name: impl Into<String>, indicator: impl Into<AnyIndicator>) -> Self {
        self.extra.push((name.into(), indicator.into()));
        self
    }

    /// # Errors
    ///
    /// - [`ConstructionError::UnknownIndicator`] for a per-indicator
    ///   override naming no category member.
    /// - [`ConstructionError::UnknownParameter`] for an override no member
    ///   accepts.
    /// - [`ConstructionError::DuplicateName`] when two members share a name.
    /// - Any error an overridden config builder reports.
    pub fn build(self) -> Result<StrategyGroup, ConstructionError> {
        let kinds: Vec<IndicatorKind> = self
            .category
            .map(|category| category.members().collect())
            .unwrap_or_default();

        if let Some(unknown) = self
            .overrides
            .keys()
            .find(|name| !kinds.iter().any(|kind| kind.to_string() == **name))
        {
            return Err(ConstructionError::UnknownIndicator(unknown.clone()));
        }

        if let Some(unused) = self
            .global
            .names()
            .find(|name| !kinds.iter().any(|kind| kind.accepts(name)))
        {
            return Err(ConstructionError::UnknownParameter {
                indicator: self
                    .category
                    .map_or_else(|| "strategy group".to_owned(), |c| c.to_string()),
                name: unused.to_owned(),
            });
        }

        let mut members = Vec::with_capacity(kinds.len() + self.extra.len());
        for kind in kinds {
            let name = kind.to_string();
            let mut params = Params::new();
            for global in self.global.names().filter(|global| kind.accepts(global)) {
                if let Some(value) = self.global.get(global) {
                    params.set(global, value);
                }
            }
            if let Some(specific) = self.overrides.get(&name) {
                params = params.overlay(specific);
            }

            members.push(Member {
                name: name.into(),
                indicator: AnyIndicator::with_params(kind, &params)?,
            });
        }

        for (name, indicator) in self.extra {
            if members.iter().any(|member| *member.name == *name) {
                return Err(ConstructionError::DuplicateName(name));
            }
            members.push(Member {
                name: name.into(),
                indicator,
            });
        }

        Ok(StrategyGroup::from_members(members, self.tick_schema))
    }
}

/// Result of one [`StrategyGroup::update`].
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    values: Vec<(Arc<str>, Option<IndicatorValue>)>,
    failures: Vec<MemberFailure>,
}

impl TickReport {
    /// Every member's value after the tick, in construction order.
    pub fn values(&self) -> impl Iterator<Item = (&str, Option<IndicatorValue>)> {
        self.values.iter().map(|(name, value)| (&**name, *value))
    }

    /// Value of member `name`, `None` if it is not ready or not a member.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<IndicatorValue> {
        self.values
            .iter()
            .find(|(member, _)| &**member == name)
            .and_then(|(_, value)| *value)
    }

    /// Members that rejected the tick. Their state did not advance.
    #[must_use]
    pub fn failures(&self) -> &[MemberFailure] {
        &self.failures
    }

    /// True when every member accepted the tick.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of members holding a value.
    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.values.iter().filter(|(_, value)| value.is_some()).count()
    }
}

/// A member that rejected a tick the group accepted.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberFailure {
    name: Arc<str>,
    error: InputError,
}

impl MemberFailure {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn error(&self) -> InputError {
        self.error
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{Field, Rsi, RsiConfig, Sma, SmaConfig, test_util::walk};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn group_is_send_and_sync() {
        assert_send_sync::<StrategyGroup>();
        assert_send_sync::<TickReport>();
    }

    #[test]
    fn category_members_in_canonical_order() {
        let group = StrategyGroup::new(Category::Momentum);
        let names: Vec<&str> = group.names().collect();
        assert_eq!(
            names,
            [
                "rsi",
                "stochastic",
                "williams_r",
                "roc",
                "ppo",
                "pvo",
                "ultimate_oscillator",
                "stoch_rsi",
                "tsi",
                "awesome_oscillator",
                "kama",
                "momentum",
            ]
        );
        assert_eq!(StrategyGroup::new(Category::All).len(), 54);
    }

    #[test]
    fn category_names_parse_case_insensitively() {
        assert_eq!(StrategyGroup::for_category("VOLUME").unwrap().len(), 11);
        assert_eq!(
            StrategyGroup::for_category("sideways").unwrap_err(),
            ConstructionError::UnknownCategory("sideways".into())
        );
    }

    #[test]
    fn schema_is_union_of_members() {
        assert_eq!(StrategyGroup::new(Category::Volume).schema(), Schema::HLCV);
        assert_eq!(StrategyGroup::builder_empty().build().unwrap().schema(), Schema::EMPTY);
    }

    #[test]
    fn tick_schema_is_what_every_member_reads() {
        assert_eq!(StrategyGroup::new(Category::Volume).tick_schema(), Schema::VOLUME);
        assert_eq!(StrategyGroup::new(Category::Trend).tick_schema(), Schema::EMPTY);
        assert_eq!(
            StrategyGroup::builder(Category::Trend)
                .tick_schema(Schema::HLC)
                .build()
                .unwrap()
                .tick_schema(),
            Schema::HLC
        );
    }

    #[test]
    fn close_only_tick_advances_close_members() {
        let mut group = StrategyGroup::builder(Category::Trend)
            .param("window", 3.0)
            .build()
            .unwrap();

        let mut report = None;
        for price in [10.0, 11.0, 12.0, 13.0] {
            report = Some(group.update(&Tick::price(price)).unwrap());
        }
        let report = report.unwrap();

        assert_eq!(report.get("sma"), Some(IndicatorValue::Scalar(12.0)));
        assert!(group.indicator("wma").unwrap().is_ready());

        let failed: Vec<&str> = report.failures().iter().map(MemberFailure::name).collect();
        for name in ["adx", "cci", "vortex", "aroon", "psar"] {
            assert!(failed.contains(&name), "{name}");
        }
        assert!(!failed.contains(&"sma"));
        assert!(
            report
                .failures()
                .iter()
                .all(|failure| failure.error() == InputError::MissingField(Field::High))
        );
        assert!(!report.is_complete());
        assert!(!group.indicator("adx").unwrap().is_ready());
    }

    #[test]
    fn non_finite_field_fails_only_its_readers() {
        let mut group = StrategyGroup::builder_empty()
            .add("sma", Sma::new(SmaConfig::new(2).unwrap()))
            .add("atr", AnyIndicator::new(IndicatorKind::Atr))
            .build()
            .unwrap();

        let report = group
            .update(&Tick::hlc(f64::NAN, 9.0, 10.0))
            .unwrap();
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].name(), "atr");
        assert_eq!(report.failures()[0].error(), InputError::NonFinite(Field::High));

        group.update(&Tick::price(12.0)).unwrap();
        assert_eq!(group.indicator("sma").unwrap().value(), Some(IndicatorValue::Scalar(11.0)));
    }

    #[test]
    fn declared_tick_schema_rejects_whole_tick() {
        let mut group = StrategyGroup::builder(Category::Trend)
            .tick_schema(Schema::HLC)
            .build()
            .unwrap();
        let before = group.clone();

        assert_eq!(
            group.update(&Tick::price(10.0)).unwrap_err(),
            InputError::MissingField(Field::High)
        );
        assert_eq!(group.current_values(), before.current_values());
        assert!(group.ready_status().iter().all(|(_, ready)| !ready));
    }

    #[test]
    fn global_override_reaches_every_window() {
        let group = StrategyGroup::builder(Category::Trend)
            .param("window", 5.0)
            .build()
            .unwrap();

        assert_eq!(group.indicator("sma").unwrap().required_ticks(), 5);
        assert_eq!(group.indicator("ema").unwrap().required_ticks(), 5);
        // MACD has no `window`
        assert_eq!(
            group.indicator("macd").unwrap().required_ticks(),
            AnyIndicator::new(IndicatorKind::Macd).required_ticks()
        );
    }

    #[test]
    fn per_indicator_override_wins() {
        let group = StrategyGroup::builder(Category::Momentum)
            .param("window", 10.0)
            .param_for("rsi", "window", 3.0)
            .build()
            .unwrap();

        assert_eq!(group.indicator("rsi").unwrap().required_ticks(), 4);
        assert_eq!(group.indicator("williams_r").unwrap().required_ticks(), 10);
    }

    #[test]
    fn bad_overrides_are_rejected() {
        assert_eq!(
            StrategyGroup::builder(Category::Trend)
                .param_for("rsi", "window", 3.0)
                .build()
                .unwrap_err(),
            ConstructionError::UnknownIndicator("rsi".into())
        );
        assert_eq!(
            StrategyGroup::builder(Category::Trend)
                .param_for("sma", "multiplier", 3.0)
                .build()
                .unwrap_err(),
            ConstructionError::UnknownParameter {
                indicator: "sma".into(),
                name: "multiplier".into(),
            }
        );
        assert_eq!(
            StrategyGroup::builder(Category::Trend)
                .param("annualize", 1.0)
                .build()
                .unwrap_err(),
            ConstructionError::UnknownParameter {
                indicator: "trend".into(),
                name: "annualize".into(),
            }
        );
        assert_eq!(
            StrategyGroup::builder(Category::Trend)
                .param("window", 0.0)
                .build()
                .unwrap_err(),
            ConstructionError::ZeroWindow { name: "window" }
        );
    }

    #[test]
    fn custom_group_rejects_duplicate_names() {
        let sma = Sma::new(SmaConfig::new(3).unwrap());
        let result = StrategyGroup::builder_empty()
            .add("fast", sma.clone())
            .add("fast", sma)
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConstructionError::DuplicateName("fast".into())
        );

        let result = StrategyGroup::builder(Category::Trend)
            .add("sma", Sma::new(SmaConfig::new(3).unwrap()))
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConstructionError::DuplicateName("sma".into())
        );
    }

    #[test]
    fn custom_group_updates_members_alike() {
        let mut group = StrategyGroup::builder_empty()
            .add("fast", Sma::new(SmaConfig::new(2).unwrap()))
            .add("slow", Sma::new(SmaConfig::new(4).unwrap()))
            .add("rsi", Rsi::new(RsiConfig::new(3).unwrap()))
            .build()
            .unwrap();
        assert_eq!(group.schema(), Schema::CLOSE);

        let mut reports = Vec::new();
        for price in [1.0, 2.0, 3.0, 4.0] {
            reports.push(group.update(&Tick::price(price)).unwrap());
        }

        assert_eq!(reports[0].ready_count(), 0);
        assert_eq!(reports[1].get("fast"), Some(IndicatorValue::Scalar(1.5)));
        assert_eq!(reports[3].get("slow"), Some(IndicatorValue::Scalar(2.5)));
        assert_eq!(reports[3].get("rsi"), Some(IndicatorValue::Scalar(100.0)));
        assert!(reports.iter().all(TickReport::is_complete));
        assert!(group.all_ready());
    }

    #[test]
    fn reset_all_clears_every_member() {
        let mut group = StrategyGroup::new(Category::Volatility);
        for tick in walk(60) {
            group.update(&tick).unwrap();
        }
        assert!(group.ready_status().iter().any(|(_, ready)| *ready));

        group.reset_all();
        assert!(group.current_values().iter().all(|(_, value)| value.is_none()));
    }

    #[test]
    fn all_group_readies_over_a_long_walk() {
        let mut group = StrategyGroup::new(Category::All);
        let mut last = None;
        for tick in walk(400) {
            last = Some(group.update(&tick).unwrap());
        }
        let report = last.unwrap();
        assert_eq!(report.ready_count(), group.len());
        assert!(group.all_ready());
        assert_eq!(report.values().count(), 54);
    }

    #[test]
    fn indicator_lookup_by_name() {
        let group = StrategyGroup::new(Category::Others);
        assert_eq!(
            group.indicator("z_score").map(AnyIndicator::kind),
            Some(IndicatorKind::ZScore)
        );
        assert!(group.indicator("zscore").is_none());
        assert!(group.to_string().starts_with("StrategyGroup[daily_return: DR(Close)"));
    }
}
