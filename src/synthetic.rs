use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::raw_table::RawTable;
use crate::stats::RawStat;

const COMPETITIONS: [(&str, &[&str]); 5] = [
    (
        "eng Premier League",
        &["Arsenal", "Chelsea", "Everton", "Fulham", "Liverpool", "Newcastle Utd"],
    ),
    (
        "es La Liga",
        &["Barcelona", "Betis", "Girona", "Real Madrid", "Sevilla", "Valencia"],
    ),
    (
        "de Bundesliga",
        &["Bayern Munich", "Dortmund", "Freiburg", "Leverkusen", "Mainz 05", "Union Berlin"],
    ),
    (
        "it Serie A",
        &["Atalanta", "Bologna", "Inter", "Juventus", "Napoli", "Roma"],
    ),
    (
        "fr Ligue 1",
        &["Lens", "Lille", "Lyon", "Marseille", "Monaco", "Paris S-G"],
    ),
];

// Weighted roughly like a real squad list; "" leaves the position blank.
const POSITIONS: [&str; 12] = [
    "GK", "DF", "DF", "DF", "DF,MF", "MF", "MF", "MF,FW", "FW", "FW", "FW,MF", "",
];

const FIRST: [&str; 12] = [
    "Adrien", "Bruno", "Carlos", "Dani", "Emil", "Felix", "Gio", "Hugo", "Ivan", "Jonas", "Kai",
    "Luca",
];
const LAST: [&str; 12] = [
    "Almeida", "Berg", "Costa", "Duarte", "Eriksen", "Fischer", "Garcia", "Hoffmann", "Ionescu",
    "Jensen", "Keller", "Lorenz",
];

struct Profile {
    goals: f64,
    assists: f64,
    prog_carries: f64,
    prog_passes: f64,
    tackles: f64,
    interceptions: f64,
    sca: f64,
    blocks: f64,
    shots: f64,
    touches: f64,
    crosses_pa: f64,
    carries: f64,
}

fn profile_for(pos: &str) -> Profile {
    if pos.contains("GK") {
        return Profile {
            goals: 0.0,
            assists: 0.005,
            prog_carries: 0.05,
            prog_passes: 0.4,
            tackles: 0.02,
            interceptions: 0.05,
            sca: 0.05,
            blocks: 0.02,
            shots: 0.0,
            touches: 38.0,
            crosses_pa: 0.0,
            carries: 22.0,
        };
    }
    if pos.starts_with("FW") {
        Profile {
            goals: 0.42,
            assists: 0.15,
            prog_carries: 2.8,
            prog_passes: 2.2,
            tackles: 0.8,
            interceptions: 0.3,
            sca: 3.4,
            blocks: 0.4,
            shots: 2.9,
            touches: 40.0,
            crosses_pa: 0.2,
            carries: 24.0,
        }
    } else if pos.starts_with("MF") {
        Profile {
            goals: 0.12,
            assists: 0.12,
            prog_carries: 1.8,
            prog_passes: 5.8,
            tackles: 2.0,
            interceptions: 1.0,
            sca: 2.6,
            blocks: 1.1,
            shots: 1.2,
            touches: 62.0,
            crosses_pa: 0.15,
            carries: 38.0,
        }
    } else {
        Profile {
            goals: 0.04,
            assists: 0.05,
            prog_carries: 0.9,
            prog_passes: 3.9,
            tackles: 1.9,
            interceptions: 1.4,
            sca: 1.0,
            blocks: 1.6,
            shots: 0.5,
            touches: 64.0,
            crosses_pa: 0.1,
            carries: 40.0,
        }
    }
}

fn count(rng: &mut StdRng, rate: f64, nineties: f64) -> f64 {
    let jitter: f64 = rng.gen_range(0.6..1.4);
    (rate * jitter * nineties).round().max(0.0)
}

/// A deterministic FBref-shaped season table for demos and benches. Roughly one row in
/// ten plays under the default minutes threshold and a few cells are left blank.
pub fn synthetic_season(players: usize, seed: u64) -> RawTable {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut headers: Vec<String> = ["Player", "Pos", "Age", "Squad", "Comp", "Min", "90s"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    headers.extend(RawStat::ALL.iter().map(|s| s.column().to_string()));

    let mut rows = Vec::with_capacity(players);
    for idx in 0..players {
        let (comp, squads) = COMPETITIONS[rng.gen_range(0..COMPETITIONS.len())];
        let squad = squads[rng.gen_range(0..squads.len())];
        let pos = POSITIONS[rng.gen_range(0..POSITIONS.len())];
        let name = format!(
            "{} {} {}",
            FIRST[idx % FIRST.len()],
            LAST[(idx / FIRST.len()) % LAST.len()],
            idx / (FIRST.len() * LAST.len()) + 1
        );
        let age: u32 = rng.gen_range(17..=37);
        let minutes: u32 = if rng.gen_bool(0.1) {
            rng.gen_range(10..450)
        } else {
            rng.gen_range(450..=3420)
        };
        let nineties = (f64::from(minutes) / 90.0 * 10.0).round() / 10.0;

        let p = profile_for(pos);
        let goals = count(&mut rng, p.goals, nineties);
        let assists = count(&mut rng, p.assists, nineties);
        let shots = count(&mut rng, p.shots, nineties).max(goals);
        let xg = ((goals * rng.gen_range(0.7_f64..1.3)) * 10.0).round() / 10.0;
        let xag = ((assists * rng.gen_range(0.7_f64..1.3)) * 10.0).round() / 10.0;
        let values: Vec<(RawStat, f64)> = vec![
            (RawStat::Goals, goals),
            (RawStat::Assists, assists),
            (RawStat::GoalsAssists, goals + assists),
            (RawStat::Xg, xg),
            (RawStat::Xag, xag),
            (RawStat::ProgCarries, count(&mut rng, p.prog_carries, nineties)),
            (RawStat::ProgPasses, count(&mut rng, p.prog_passes, nineties)),
            (RawStat::Tackles, count(&mut rng, p.tackles, nineties)),
            (RawStat::Interceptions, count(&mut rng, p.interceptions, nineties)),
            (RawStat::ShotCreating, count(&mut rng, p.sca, nineties)),
            (RawStat::Blocks, count(&mut rng, p.blocks, nineties)),
            (RawStat::Shots, shots),
            (RawStat::ShotsOnTarget, (shots * rng.gen_range(0.25_f64..0.5)).round()),
            (RawStat::Touches, count(&mut rng, p.touches, nineties)),
            (RawStat::CrossesIntoBox, count(&mut rng, p.crosses_pa, nineties)),
            (RawStat::Carries, count(&mut rng, p.carries, nineties)),
        ];

        let mut row = vec![
            name,
            pos.to_string(),
            age.to_string(),
            squad.to_string(),
            comp.to_string(),
            minutes.to_string(),
            format!("{nineties:.1}"),
        ];
        for stat in RawStat::ALL {
            let value = values
                .iter()
                .find(|(s, _)| *s == stat)
                .map(|(_, v)| *v)
                .unwrap_or(0.0);
            if rng.gen_bool(0.01) {
                row.push(String::new());
            } else {
                row.push(format!("{value}"));
            }
        }
        rows.push(row);
    }

    RawTable::new(headers, rows)
}
