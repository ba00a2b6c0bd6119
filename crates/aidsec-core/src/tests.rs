//! Pipeline tests against small hand-built incident tables.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::{
  Category, Column, DerivedTable, Error, HarmCounts, IncidentRecord,
  IncidentTable, PanelStatus, SectionId, VictimView,
  pipeline::{self, Derivation},
  render_section,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn incident(year: i32, country: &str) -> IncidentRecord {
  IncidentRecord {
    year: Some(year),
    country: Some(country.into()),
    ..Default::default()
  }
}

fn killed(mut rec: IncidentRecord, n: u64) -> IncidentRecord {
  rec.harm.killed = n;
  rec
}

fn harmed(
  mut rec: IncidentRecord,
  killed: u64,
  wounded: u64,
  kidnapped: u64,
) -> IncidentRecord {
  rec.harm = HarmCounts::new(killed, wounded, kidnapped);
  rec
}

fn with(
  mut rec: IncidentRecord,
  f: impl FnOnce(&mut IncidentRecord),
) -> IncidentRecord {
  f(&mut rec);
  rec
}

/// A mixed table touching every column.
fn sample() -> IncidentTable {
  let rows = vec![
    with(harmed(incident(2019, "Afghanistan"), 2, 1, 0), |r| {
      r.month = Some(1);
      r.region = Some("Kabul".into());
      r.means_of_attack = Some("Shooting".into());
      r.location = Some("Road".into());
      r.actor_type = Some("Unknown".into());
      r.total_nationals = 3;
      r.nationals = HarmCounts::new(2, 1, 0);
    }),
    with(harmed(incident(2019, "South Sudan"), 0, 3, 0), |r| {
      r.month = Some(4);
      r.means_of_attack = Some("Bodily assault".into());
      r.location = Some("Office/compound".into());
      r.actor_type = Some("Non-state armed group: National".into());
      r.total_nationals = 2;
      r.total_internationals = 1;
      r.nationals = HarmCounts::new(0, 2, 0);
      r.internationals = HarmCounts::new(0, 1, 0);
    }),
    with(harmed(incident(2020, "Afghanistan"), 1, 0, 2), |r| {
      r.month = Some(4);
      r.region = Some("Herat".into());
      r.means_of_attack = Some("Kidnapping".into());
      r.location = Some("Road".into());
      r.actor_type = Some("Unknown".into());
      r.total_nationals = 2;
      r.total_internationals = 1;
      r.nationals = HarmCounts::new(1, 0, 1);
      r.internationals = HarmCounts::new(0, 0, 1);
    }),
    with(harmed(incident(2020, "Syria"), 4, 0, 0), |r| {
      r.month = Some(11);
      r.means_of_attack = Some("Shooting".into());
      r.location = Some("Road".into());
      r.actor_type = Some("Host state".into());
      r.total_nationals = 4;
      r.nationals = HarmCounts::new(4, 0, 0);
    }),
    // Sparse row: no month, no category fields besides country.
    harmed(incident(2021, "Syria"), 0, 0, 0),
  ];
  IncidentTable::with_all_columns(rows)
}

fn without(table: &IncidentTable, column: Column) -> IncidentTable {
  IncidentTable::new(
    table.records().to_vec(),
    table.columns().filter(|c| *c != column),
  )
}

// ─── Year-keyed derivations ──────────────────────────────────────────────────

#[test]
fn frequency_by_year_matches_record_counts() {
  let table = sample();
  let rows = pipeline::incidents_per_year(&table).unwrap();

  let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
  assert_eq!(years, vec![2019, 2020, 2021]);

  for row in rows {
    let expected =
      table.iter().filter(|r| r.year == Some(row.year)).count() as u64;
    assert_eq!(row.incidents, expected, "year {}", row.year);
  }
}

#[test]
fn records_without_a_year_are_not_counted() {
  let mut rows = sample().records().to_vec();
  rows.push(IncidentRecord {
    country: Some("Mali".into()),
    ..Default::default()
  });
  let table = IncidentTable::with_all_columns(rows);
  let total: u64 = pipeline::incidents_per_year(&table)
    .unwrap()
    .iter()
    .map(|r| r.incidents)
    .sum();
  assert_eq!(total, 5);
}

#[test]
fn severity_by_year_scenario() {
  let table = IncidentTable::with_all_columns(vec![
    killed(incident(2020, "A"), 1),
    killed(incident(2020, "B"), 2),
    killed(incident(2021, "A"), 3),
  ]);

  let severity = pipeline::severity_by_year(&table).unwrap();
  let killed: Vec<(i32, u64)> =
    severity.iter().map(|r| (r.year, r.harm.killed)).collect();
  assert_eq!(killed, vec![(2020, 3), (2021, 3)]);

  let top = pipeline::top_by_harm(&table, Category::Country, 1).unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0].value, "A");
  assert_eq!(top[0].harm.killed, 4);
}

#[test]
fn combined_impact_agrees_with_severity() {
  let table = sample();
  let severity = pipeline::severity_by_year(&table).unwrap();
  let impact = pipeline::impact_by_year(&table).unwrap();
  assert_eq!(severity.len(), impact.len());
  for (s, i) in severity.iter().zip(&impact) {
    assert_eq!(s.year, i.year);
    assert_eq!(s.harm.killed + s.harm.wounded + s.harm.kidnapped, i.victims);
  }
}

// ─── Rankings ────────────────────────────────────────────────────────────────

#[test]
fn top_n_is_bounded_and_descending() {
  let table = sample();
  for n in [0, 1, 2, 10] {
    let ranked = pipeline::top_n(&table, Category::Country, n).unwrap();
    assert!(ranked.len() <= n);
    for pair in ranked.windows(2) {
      assert!(pair[0].incidents >= pair[1].incidents);
    }
  }
  let ranked = pipeline::top_n(&table, Category::Country, 10).unwrap();
  assert_eq!(ranked.len(), 3);
}

#[test]
fn top_n_ties_keep_source_order() {
  let table = IncidentTable::with_all_columns(vec![
    incident(2020, "C"),
    incident(2020, "B"),
    incident(2020, "A"),
    incident(2021, "A"),
  ]);
  let ranked = pipeline::top_n(&table, Category::Country, 2).unwrap();
  let values: Vec<&str> = ranked.iter().map(|c| c.value.as_str()).collect();
  assert_eq!(values, vec!["A", "C"]);
}

#[test]
fn missing_categories_are_not_bucketed() {
  let table = sample();
  let ranked = pipeline::value_counts(&table, Category::Region).unwrap();
  let total: u64 = ranked.iter().map(|c| c.incidents).sum();
  assert_eq!(total, 2);
  assert!(ranked.iter().all(|c| !c.value.is_empty()));
}

#[test]
fn unknown_is_an_ordinary_category() {
  let table = sample();
  let ranked = pipeline::top_n(&table, Category::ActorType, 1).unwrap();
  assert_eq!(ranked[0].value, "Unknown");
  assert_eq!(ranked[0].incidents, 2);
}

// ─── Trends and cross-tabs ───────────────────────────────────────────────────

#[test]
fn category_trend_is_restricted_to_top_k() {
  let table = sample();
  let trend = pipeline::category_trend(&table, Category::Country, 1).unwrap();
  assert!(trend.iter().all(|p| p.value == "Afghanistan"));
  let years: Vec<i32> = trend.iter().map(|p| p.year).collect();
  assert_eq!(years, vec![2019, 2020]);
}

#[test]
fn cross_count_restricts_the_first_axis() {
  let table = sample();
  let only = vec!["Shooting".to_string()];
  let rows = pipeline::cross_count(
    &table,
    Category::MeansOfAttack,
    Category::Location,
    Some(&only),
  )
  .unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].a, "Shooting");
  assert_eq!(rows[0].b, "Road");
  assert_eq!(rows[0].incidents, 2);
}

#[test]
fn cross_harm_sums_per_pair() {
  let table = sample();
  let rows =
    pipeline::cross_harm(&table, Category::Country, Category::MeansOfAttack)
      .unwrap();
  let by_pair: HashMap<(&str, &str), HarmCounts> = rows
    .iter()
    .map(|r| ((r.a.as_str(), r.b.as_str()), r.harm))
    .collect();
  assert_eq!(by_pair[&("Syria", "Shooting")], HarmCounts::new(4, 0, 0));
  // The sparse Syria row has no means of attack.
  assert_eq!(rows.len(), 4);
}

// ─── Proportional breakdowns ─────────────────────────────────────────────────

#[test]
fn staff_shares_sum_to_one_hundred() {
  let table = sample();
  let groups = pipeline::staff_share_by_harm(&table).unwrap();
  assert_eq!(groups.len(), 3);
  for g in &groups {
    assert_eq!(g.shares.len(), 2);
    assert!((g.percent_sum() - 100.0).abs() < 1e-9, "{}", g.group);
  }
}

#[test]
fn zero_harm_actor_emits_zero_percent() {
  let table = IncidentTable::with_all_columns(vec![
    with(harmed(incident(2020, "A"), 0, 0, 0), |r| {
      r.actor_type = Some("Criminal".into())
    }),
    with(harmed(incident(2020, "A"), 0, 0, 0), |r| {
      r.actor_type = Some("Criminal".into())
    }),
    with(harmed(incident(2020, "B"), 1, 1, 0), |r| {
      r.actor_type = Some("Host state".into())
    }),
  ]);

  let groups = pipeline::harm_mix(&table, Category::ActorType, 5).unwrap();
  let criminal = groups.iter().find(|g| g.group == "Criminal").unwrap();
  assert!(criminal.data_poor);
  assert_eq!(criminal.shares.len(), 3);
  assert!(criminal.shares.iter().all(|s| s.percent == 0.0));
  assert_eq!(criminal.percent_sum(), 0.0);

  let host = groups.iter().find(|g| g.group == "Host state").unwrap();
  assert!(!host.data_poor);
  assert!((host.percent_sum() - 100.0).abs() < 1e-9);
}

#[test]
fn zero_harm_group_is_flagged_in_the_caption() {
  let table = IncidentTable::with_all_columns(vec![with(
    incident(2020, "A"),
    |r| r.actor_type = Some("Criminal".into()),
  )]);
  let view =
    render_section(&table, SectionId::PerpetratorAnalysis, VictimView::Total);
  let mix = view
    .panels
    .iter()
    .find(|p| p.spec.derivation == Derivation::HarmMixByActor)
    .unwrap();
  let PanelStatus::Ready { caption, .. } = &mix.status else {
    panic!("harm mix should render: {:?}", mix.status);
  };
  assert!(caption.as_deref().unwrap().contains("Criminal"));
}

// ─── Calendar buckets ────────────────────────────────────────────────────────

#[test]
fn monthly_and_quarterly_buckets_are_chronological() {
  let table = sample();
  let months = pipeline::monthly(&table).unwrap();
  let labels: Vec<&str> = months.iter().map(|b| b.label.as_str()).collect();
  assert_eq!(labels, vec!["2019-01", "2019-04", "2020-04", "2020-11"]);

  let quarters = pipeline::quarterly(&table).unwrap();
  let labels: Vec<&str> = quarters.iter().map(|b| b.label.as_str()).collect();
  assert_eq!(labels, vec!["2019Q1", "2019Q2", "2020Q2", "2020Q4"]);
  assert_eq!(quarters.iter().map(|b| b.incidents).sum::<u64>(), 4);
}

#[test]
fn out_of_range_months_are_skipped() {
  let table = IncidentTable::with_all_columns(vec![
    with(incident(2020, "A"), |r| r.month = Some(13)),
    with(incident(2020, "A"), |r| r.month = Some(12)),
  ]);
  let months = pipeline::monthly(&table).unwrap();
  assert_eq!(months.len(), 1);
  assert_eq!(months[0].period, 12);
}

// ─── Totals ──────────────────────────────────────────────────────────────────

#[test]
fn summary_reports_span_and_coverage() {
  let table = without(&sample(), Column::Region);
  let summary = pipeline::dataset_summary(&table);
  assert_eq!(summary.records, 5);
  assert_eq!(summary.first_year, Some(2019));
  assert_eq!(summary.last_year, Some(2021));
  assert_eq!(summary.countries, 3);
  assert_eq!(summary.missing_columns, vec![Column::Region]);
}

#[test]
fn staff_composition_and_harm_totals() {
  let table = sample();
  let staff = pipeline::staff_composition(&table).unwrap();
  assert_eq!(staff[0].value, 11);
  assert_eq!(staff[1].value, 2);

  let harm = pipeline::harm_totals(&table).unwrap();
  let values: Vec<u64> = harm.iter().map(|h| h.value).collect();
  assert_eq!(values, vec![7, 4, 2]);
}

// ─── Catalog behaviour ───────────────────────────────────────────────────────

#[test]
fn every_derivation_is_idempotent() {
  let table = sample();
  for derivation in Derivation::iter() {
    let first = derivation.run(&table);
    let second = derivation.run(&table);
    match (first, second) {
      (Ok(a), Ok(b)) => assert_eq!(a, b, "{derivation}"),
      (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
      _ => panic!("{derivation} changed outcome between runs"),
    }
  }
}

#[test]
fn every_derivation_runs_on_a_complete_table() {
  let table = sample();
  for derivation in Derivation::iter() {
    let derived = derivation.run(&table);
    assert!(derived.is_ok(), "{derivation}: {:?}", derived.err());
  }
}

#[test]
fn missing_region_skips_only_the_regional_panel() {
  let table = without(&sample(), Column::Region);

  let err = Derivation::RegionalDistribution.run(&table).unwrap_err();
  assert!(matches!(err, Error::ColumnMissing(Column::Region)));

  let view =
    render_section(&table, SectionId::GeographicPatterns, VictimView::Total);
  let notices: Vec<&str> = view.notices().collect();
  assert_eq!(notices.len(), 1);
  assert!(notices[0].contains("Region"));
  assert_eq!(view.panels.iter().filter(|p| p.is_ready()).count(), 3);

  for derivation in
    Derivation::iter().filter(|d| *d != Derivation::RegionalDistribution)
  {
    assert!(derivation.run(&table).is_ok(), "{derivation}");
  }
}

#[test]
fn empty_table_yields_empty_groups_not_panics() {
  let table = IncidentTable::with_all_columns(Vec::new());
  assert!(matches!(
    Derivation::TopCountries.run(&table),
    Err(Error::EmptyGroup(Derivation::TopCountries))
  ));

  // Fixed-shape derivations still render.
  let DerivedTable::Breakdown(groups) =
    Derivation::StaffShareByHarm.run(&table).unwrap()
  else {
    panic!("expected breakdown");
  };
  assert!(groups.iter().all(|g| g.data_poor));

  let view =
    render_section(&table, SectionId::YearlyTrends, VictimView::Total);
  assert!(
    view
      .panels
      .iter()
      .all(|p| matches!(p.status, PanelStatus::Empty { .. }))
  );
}

#[test]
fn panel_outcomes_cover_every_error() {
  let missing = PanelStatus::from_result(
    Derivation::RegionalDistribution,
    Err(Error::ColumnMissing(Column::Region)),
  );
  assert!(matches!(
    missing,
    PanelStatus::Unavailable { column: Column::Region, .. }
  ));

  let empty = PanelStatus::from_result(
    Derivation::TopCountries,
    Err(Error::EmptyGroup(Derivation::TopCountries)),
  );
  assert_eq!(empty, PanelStatus::Empty {
    message: "No incidents to show for this view.".into(),
  });

  let PanelStatus::Empty { message } = PanelStatus::from_result(
    Derivation::IncidentsPerYear,
    Err(Error::DataUnavailable("file gone".into())),
  ) else {
    panic!("expected a placeholder");
  };
  assert!(message.contains("file gone"));
}

#[test]
fn every_section_renders_against_the_sample() {
  let table = sample();
  for section in SectionId::iter() {
    for view in [VictimView::Total, VictimView::Proportional] {
      let rendered = render_section(&table, section, view);
      assert_eq!(rendered.id, section);
      assert!(
        rendered.panels.iter().all(|p| p.is_ready()),
        "{section}: {:?}",
        rendered.notices().collect::<Vec<_>>()
      );
    }
  }
}

#[test]
fn staff_composition_caption() {
  let table = sample();
  let view =
    render_section(&table, SectionId::VictimProfiles, VictimView::Total);
  let PanelStatus::Ready { caption, .. } = &view.panels[0].status else {
    panic!("staff composition should render");
  };
  assert_eq!(
    caption.as_deref(),
    Some("Among the 13 recorded aid worker victims, 84.6% are national staff.")
  );
}

// ─── Extreme counts ──────────────────────────────────────────────────────────

#[test]
fn huge_counts_saturate_instead_of_panicking() {
  let big = i64::MAX as u64;
  let heavy = |year| {
    with(harmed(incident(year, "A"), big, big, big), |r| {
      r.actor_type = Some("Criminal".into());
      r.means_of_attack = Some("Shooting".into());
      r.total_nationals = big;
      r.total_internationals = big;
      r.nationals = HarmCounts::new(big, big, big);
      r.internationals = HarmCounts::new(big, big, big);
    })
  };
  let table = IncidentTable::with_all_columns(vec![heavy(2020), heavy(2020)]);

  let DerivedTable::YearTotals(rows) =
    Derivation::ImpactByYear.run(&table).unwrap()
  else {
    panic!("expected year totals");
  };
  assert_eq!(rows[0].victims, u64::MAX);

  let DerivedTable::Breakdown(groups) =
    Derivation::StaffShareByHarm.run(&table).unwrap()
  else {
    panic!("expected breakdown");
  };
  for group in &groups {
    assert_eq!(group.total, u64::MAX);
    assert!((group.percent_sum() - 100.0).abs() < 1e-6);
  }

  for section in SectionId::iter() {
    for view in [VictimView::Total, VictimView::Proportional] {
      let rendered = render_section(&table, section, view);
      assert!(rendered.notices().next().is_none(), "{section}");
    }
  }
}
