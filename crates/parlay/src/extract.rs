use crate::{
    constants::SAFE_LEG_THRESHOLD,
    leg::Leg,
    market::{MatchSnapshot, Outcome},
};

/// Turns one match's market bundle into its safe single-outcome legs.
pub fn extract_legs(snapshot: &MatchSnapshot) -> Vec<Leg> {
    let home = snapshot.summary.home_team.as_str();
    let away = snapshot.summary.away_team.as_str();
    let markets = &snapshot.markets;
    let mut legs = Vec::new();

    if let Some(dnb) = markets.dnb {
        push_if_safe(&mut legs, Outcome::DnbHome, dnb.home, || {
            format!("{home} (Draw No Bet)")
        });
        push_if_safe(&mut legs, Outcome::DnbAway, dnb.away, || {
            format!("{away} (Draw No Bet)")
        });
    }

    if let Some(totals) = markets.totals {
        let lines = [
            (Outcome::Under35, totals.under_3_5, "Under 3.5 Goals"),
            (Outcome::Under45, totals.under_4_5, "Under 4.5 Goals"),
            (Outcome::Over25, totals.over_2_5, "Over 2.5 Goals"),
        ];
        for (outcome, probability, label) in lines {
            if let Some(probability) = probability {
                push_if_safe(&mut legs, outcome, probability, || label.to_string());
            }
        }
    }

    if let Some(btts) = markets.btts {
        push_if_safe(&mut legs, Outcome::BttsYes, btts.yes, || {
            "Both Teams To Score: Yes".to_string()
        });
        push_if_safe(&mut legs, Outcome::BttsNo, btts.no, || {
            "Both Teams To Score: No".to_string()
        });
    }

    if let Some(double_chance) = markets.double_chance {
        push_if_safe(
            &mut legs,
            Outcome::HomeOrDraw,
            double_chance.home_or_draw,
            || format!("Double Chance: {home} or Draw"),
        );
        push_if_safe(
            &mut legs,
            Outcome::DrawOrAway,
            double_chance.draw_or_away,
            || format!("Double Chance: Draw or {away}"),
        );
    }

    legs
}

pub fn is_safe_probability(probability: f64) -> bool {
    probability.is_finite() && probability <= 1.0 && probability >= SAFE_LEG_THRESHOLD
}

fn push_if_safe(
    legs: &mut Vec<Leg>,
    outcome: Outcome,
    probability: f64,
    describe: impl FnOnce() -> String,
) {
    if is_safe_probability(probability) {
        legs.push(Leg::new(outcome, probability, describe()));
    }
}
