//! Static narrative text for each section.

use crate::section::SectionId;

/// A titled block of bullet points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Block {
  pub title:   &'static str,
  pub bullets: &'static [&'static str],
}

/// Paragraphs shown under the section heading, before any chart.
pub fn intro(section: SectionId) -> &'static [&'static str] {
  match section {
    SectionId::Introduction => &[
      "An interactive look at documented security incidents involving \
       humanitarian aid workers: when, where and how attacks happen, and who \
       they affect.",
      "The dashboard is meant for policymakers, NGOs, field organisations \
       and researchers planning around these risks.",
    ],
    SectionId::YearlyTrends => &[
      "How often incidents happen and how severe they are, year by year.",
    ],
    SectionId::GeographicPatterns => &[
      "Attacks are not evenly spread. This section ranks countries and \
       regions and follows the most affected countries over time.",
    ],
    SectionId::AttackTypes => &[
      "Which attack methods are most common, where they happen and how the \
       mix has shifted.",
    ],
    SectionId::VictimProfiles => &[
      "Who is harmed: national versus international staff, and by which \
       kind of harm.",
    ],
    SectionId::PerpetratorAnalysis => &[
      "Who carries out attacks, what harm each actor type causes and where \
       they operate.",
    ],
    SectionId::TimeCrossAnalysis => &[
      "Finer time buckets, and harm broken down jointly by country and \
       attack method.",
    ],
    SectionId::Conclusion => &[
      "Security threats to aid workers are persistent, concentrated and \
       fall hardest on national staff. The data points to where protection \
       effort should go.",
    ],
  }
}

/// Bullet blocks shown after the charts.
pub fn closing(section: SectionId) -> &'static [Block] {
  match section {
    SectionId::Introduction => &[Block {
      title:   "What This Dashboard Covers",
      bullets: &[
        "Yearly Trends: frequency and severity over time.",
        "Geographic Patterns: the most dangerous countries and regions.",
        "Attack Types: methods and the locations they occur in.",
        "Victim Profiles: national versus international staff.",
        "Perpetrator Analysis: actor types and the harm they cause.",
        "Time & Cross Analysis: monthly and quarterly trends, country × \
         method × severity.",
        "Conclusion & Recommendations: actions that follow from the data.",
      ],
    }],
    SectionId::Conclusion => &[
      Block {
        title:   "Key Conclusions",
        bullets: &[
          "Incidents grew substantially over the period, with volatile \
           peaks during major conflicts.",
          "A small set of conflict-affected countries accounts for most \
           attacks.",
          "Shootings, kidnappings and bodily assault dominate, most often on \
           roads.",
          "National staff are the overwhelming majority of victims.",
          "Many attacks cannot be attributed to a known actor.",
        ],
      },
      Block {
        title:   "Strategic Recommendations",
        bullets: &[
          "Invest in protection, training and insurance for national staff.",
          "Prioritise security planning in persistent hotspots.",
          "Harden road movement: routing, convoys, communications.",
          "Improve incident reporting and attribution.",
          "Plan surge capacity around recurring high-risk periods.",
        ],
      },
    ],
    _ => &[],
  }
}
