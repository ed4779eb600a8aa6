//! Built-in survey catalogue
//!
//! Reference wavelengths are the effective wavelengths (µm) of the band the
//! survey reports in. Color excesses are E(B-V) between 0.493 and 0.551 µm.

use super::{Availability, Dimensionality, EntrySpec, QuantityKind};
use crate::backend::{BackendKind, Options};

const B_BAND: f64 = 0.493;
const V_BAND: f64 = 0.551;

fn color_excess(identifier: &str, dim: Dimensionality, backend: BackendKind) -> EntrySpec {
    EntrySpec {
        identifier: identifier.to_string(),
        dim,
        returns: "E(B-V)".to_string(),
        kind: QuantityKind::ColorExcess,
        lambda_eff: B_BAND,
        lambda_eff2: Some(V_BAND),
        backend,
        options: Options::new(),
        query_options: Options::new(),
        availability: Availability::Enabled,
    }
}

fn single_band(
    identifier: &str,
    dim: Dimensionality,
    returns: &str,
    kind: QuantityKind,
    lambda_eff: f64,
    backend: BackendKind,
) -> EntrySpec {
    EntrySpec {
        identifier: identifier.to_string(),
        dim,
        returns: returns.to_string(),
        kind,
        lambda_eff,
        lambda_eff2: None,
        backend,
        options: Options::new(),
        query_options: Options::new(),
        availability: Availability::Enabled,
    }
}

pub(super) fn builtin_specs() -> Vec<EntrySpec> {
    use Dimensionality::{ThreeD, TwoD};
    use QuantityKind::{EFoldings, Extinction};

    let mut bayestar = color_excess("bayestar", ThreeD, BackendKind::Bayestar);
    bayestar.options = Options::new().with("max_samples", 0i64);
    bayestar.query_options = Options::new().with("mode", "best");

    let mut edenhofer = color_excess("edenhofer2023", ThreeD, BackendKind::Edenhofer2023);
    edenhofer.options = Options::new().with("integrated", true);

    // Leike maps report e-foldings in Gaia G; disabled until their
    // conversion is supported.
    let mut leike_ensslin = single_band(
        "leike_ensslin_2019",
        ThreeD,
        "e-foldings_GaiaG",
        EFoldings,
        0.673,
        BackendKind::LeikeEnsslin2019,
    );
    leike_ensslin.availability = Availability::Reserved;

    let mut leike = single_band(
        "leike_2020",
        ThreeD,
        "e-foldings_GaiaG",
        EFoldings,
        0.673,
        BackendKind::Leike2020,
    );
    leike.availability = Availability::Reserved;

    vec![
        bayestar,
        color_excess("bh", TwoD, BackendKind::Bh),
        single_band("chen2014", ThreeD, "A_r", Extinction, 0.622, BackendKind::Chen2014),
        color_excess("csfd", TwoD, BackendKind::Csfd),
        single_band("gaia_tge", TwoD, "A0", Extinction, 0.5414, BackendKind::GaiaTge),
        single_band("iphas", ThreeD, "A0", Extinction, 0.5495, BackendKind::Iphas),
        leike_ensslin,
        leike,
        edenhofer,
        color_excess("lenz2017", TwoD, BackendKind::Lenz2017),
        single_band("marshall", ThreeD, "A_Ks", Extinction, 2.152, BackendKind::Marshall),
        color_excess("pg2010", TwoD, BackendKind::Pg2010),
        color_excess("planck_gnlc", TwoD, BackendKind::PlanckGnilc),
        color_excess("planck", TwoD, BackendKind::Planck),
        color_excess("sfd", TwoD, BackendKind::Sfd),
    ]
}
