use tcdb_core::types::{Constituent, ReferenceData, Station};

// Schureman (1971), article 230: equilibrium amplitude coefficients of
// the principal constituents and of the constituents inferred from them.
const M2_COEFF: f64 = 0.9085;
const O1_COEFF: f64 = 0.3771;

const SEMI_DIURNAL: [(&str, f64); 10] = [
    ("N2", 0.1759),
    ("NU2", 0.0341),
    ("MU2", 0.0219),
    ("2N2", 0.0235),
    ("LDA2", 0.0066),
    ("T2", 0.0248),
    ("R2", 0.0035),
    ("L2", 0.0251),
    ("K2", 0.1151),
    ("KJ2", 0.0064),
];

const DIURNAL: [(&str, f64); 10] = [
    ("OO1", 0.0163),
    ("M1", 0.0209),
    ("J1", 0.0297),
    ("RHO1", 0.0142),
    ("Q1", 0.0730),
    ("2Q1", 0.0097),
    ("P1", 0.1755),
    ("PI1", 0.0103),
    ("PHI1", 0.0076),
    ("PSI1", 0.0042),
];

/// Fill in missing semi-diurnal and diurnal constituents on a reference
/// station from M2, S2, K1, and O1. Amplitudes scale linearly with the
/// nearest principal; epochs are interpolated linearly in frequency space
/// between the two principals and are not normalized to [0, 360).
///
/// Returns `false` without touching the station when any precondition is
/// unmet: the station is not a reference, its harmonic vectors do not
/// match the constituent table, one of the four principals is missing
/// from the table, or one of their amplitudes is not strictly positive.
/// Only entries with amplitude and epoch both zero are filled, so a
/// second invocation is a no-op.
pub fn infer_constituents(constituents: &[Constituent], station: &mut Station) -> bool {
    let Some(data) = station.reference_data_mut() else {
        return false;
    };
    if data.amplitudes.len() != constituents.len() || data.epochs.len() != constituents.len() {
        return false;
    }
    let find = |name: &str| constituents.iter().position(|c| c.name == name);
    let (Some(m2), Some(s2), Some(k1), Some(o1)) =
        (find("M2"), find("S2"), find("K1"), find("O1"))
    else {
        return false;
    };
    if [m2, s2, k1, o1].iter().any(|&i| data.amplitudes[i] <= 0.0) {
        return false;
    }

    infer_group(constituents, data, &SEMI_DIURNAL, m2, s2, M2_COEFF);
    infer_group(constituents, data, &DIURNAL, o1, k1, O1_COEFF);
    true
}

fn infer_group(
    constituents: &[Constituent],
    data: &mut ReferenceData,
    targets: &[(&str, f64)],
    principal: usize,
    secondary: usize,
    principal_coeff: f64,
) {
    let mut e_p = data.epochs[principal];
    let mut e_s = data.epochs[secondary];
    // Bring the two epochs within a half turn of each other on the circle.
    if (e_s - e_p).abs() > 180.0 {
        if e_p < e_s {
            e_p += 360.0;
        } else {
            e_s += 360.0;
        }
    }
    let speed_p = constituents[principal].speed;
    let speed_s = constituents[secondary].speed;
    let amplitude_p = data.amplitudes[principal];

    for &(name, coeff) in targets {
        let Some(target) = constituents.iter().position(|c| c.name == name) else {
            continue;
        };
        if data.amplitudes[target] != 0.0 || data.epochs[target] != 0.0 {
            continue;
        }
        data.amplitudes[target] = coeff / principal_coeff * amplitude_p;
        let r = (constituents[target].speed - speed_p) / (speed_s - speed_p);
        data.epochs[target] = e_p + r * (e_s - e_p);
    }
}
