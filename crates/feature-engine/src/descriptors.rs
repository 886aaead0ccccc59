//! Molecular Descriptor Set
//!
//! The fixed, ordered descriptor list fed to the model. Names and order
//! follow RDKit's descriptor list so models trained on RDKit features line
//! up column for column. Values follow the same definitions; a few families
//! (QED aromatic ring count, some fragment patterns) are close
//! approximations rather than exact reproductions.

use crate::burden::bcut;
use crate::charges::{gasteiger_charges, PartialCharges};
use crate::contrib;
use crate::fingerprint::MorganFingerprint;
use crate::fragments::fragment_counts;
use crate::patterns::PatternTable;
use crate::qed::{self, QedProperties};
use crate::surface::{self, SurfaceContributions};
use crate::topology::{self, Hybridization};
use molecule::{BondOrder, MatchTarget, Molecule};
use std::collections::{BTreeMap, BTreeSet};

/// Descriptor column names, in output order
pub const DESCRIPTOR_NAMES: [&str; 217] = [
    "MaxAbsEStateIndex",
    "MaxEStateIndex",
    "MinAbsEStateIndex",
    "MinEStateIndex",
    "qed",
    "SPS",
    "MolWt",
    "HeavyAtomMolWt",
    "ExactMolWt",
    "NumValenceElectrons",
    "NumRadicalElectrons",
    "MaxPartialCharge",
    "MinPartialCharge",
    "MaxAbsPartialCharge",
    "MinAbsPartialCharge",
    "FpDensityMorgan1",
    "FpDensityMorgan2",
    "FpDensityMorgan3",
    "BCUT2D_MWHI",
    "BCUT2D_MWLOW",
    "BCUT2D_CHGHI",
    "BCUT2D_CHGLO",
    "BCUT2D_LOGPHI",
    "BCUT2D_LOGPLOW",
    "BCUT2D_MRHI",
    "BCUT2D_MRLOW",
    "AvgIpc",
    "BalabanJ",
    "BertzCT",
    "Chi0",
    "Chi0n",
    "Chi0v",
    "Chi1",
    "Chi1n",
    "Chi1v",
    "Chi2n",
    "Chi2v",
    "Chi3n",
    "Chi3v",
    "Chi4n",
    "Chi4v",
    "HallKierAlpha",
    "Ipc",
    "Kappa1",
    "Kappa2",
    "Kappa3",
    "LabuteASA",
    "PEOE_VSA1",
    "PEOE_VSA10",
    "PEOE_VSA11",
    "PEOE_VSA12",
    "PEOE_VSA13",
    "PEOE_VSA14",
    "PEOE_VSA2",
    "PEOE_VSA3",
    "PEOE_VSA4",
    "PEOE_VSA5",
    "PEOE_VSA6",
    "PEOE_VSA7",
    "PEOE_VSA8",
    "PEOE_VSA9",
    "SMR_VSA1",
    "SMR_VSA10",
    "SMR_VSA2",
    "SMR_VSA3",
    "SMR_VSA4",
    "SMR_VSA5",
    "SMR_VSA6",
    "SMR_VSA7",
    "SMR_VSA8",
    "SMR_VSA9",
    "SlogP_VSA1",
    "SlogP_VSA10",
    "SlogP_VSA11",
    "SlogP_VSA12",
    "SlogP_VSA2",
    "SlogP_VSA3",
    "SlogP_VSA4",
    "SlogP_VSA5",
    "SlogP_VSA6",
    "SlogP_VSA7",
    "SlogP_VSA8",
    "SlogP_VSA9",
    "TPSA",
    "EState_VSA1",
    "EState_VSA10",
    "EState_VSA11",
    "EState_VSA2",
    "EState_VSA3",
    "EState_VSA4",
    "EState_VSA5",
    "EState_VSA6",
    "EState_VSA7",
    "EState_VSA8",
    "EState_VSA9",
    "VSA_EState1",
    "VSA_EState10",
    "VSA_EState2",
    "VSA_EState3",
    "VSA_EState4",
    "VSA_EState5",
    "VSA_EState6",
    "VSA_EState7",
    "VSA_EState8",
    "VSA_EState9",
    "FractionCSP3",
    "HeavyAtomCount",
    "NHOHCount",
    "NOCount",
    "NumAliphaticCarbocycles",
    "NumAliphaticHeterocycles",
    "NumAliphaticRings",
    "NumAmideBonds",
    "NumAromaticCarbocycles",
    "NumAromaticHeterocycles",
    "NumAromaticRings",
    "NumAtomStereoCenters",
    "NumBridgeheadAtoms",
    "NumHAcceptors",
    "NumHDonors",
    "NumHeteroatoms",
    "NumHeterocycles",
    "NumRotatableBonds",
    "NumSaturatedCarbocycles",
    "NumSaturatedHeterocycles",
    "NumSaturatedRings",
    "NumSpiroAtoms",
    "NumUnspecifiedAtomStereoCenters",
    "Phi",
    "RingCount",
    "MolLogP",
    "MolMR",
    "fr_Al_COO",
    "fr_Al_OH",
    "fr_Al_OH_noTert",
    "fr_ArN",
    "fr_Ar_COO",
    "fr_Ar_N",
    "fr_Ar_NH",
    "fr_Ar_OH",
    "fr_COO",
    "fr_COO2",
    "fr_C_O",
    "fr_C_O_noCOO",
    "fr_C_S",
    "fr_HOCCN",
    "fr_Imine",
    "fr_NH0",
    "fr_NH1",
    "fr_NH2",
    "fr_N_O",
    "fr_Ndealkylation1",
    "fr_Ndealkylation2",
    "fr_Nhpyrrole",
    "fr_SH",
    "fr_aldehyde",
    "fr_alkyl_carbamate",
    "fr_alkyl_halide",
    "fr_allylic_oxid",
    "fr_amide",
    "fr_amidine",
    "fr_aniline",
    "fr_aryl_methyl",
    "fr_azide",
    "fr_azo",
    "fr_barbitur",
    "fr_benzene",
    "fr_benzodiazepine",
    "fr_bicyclic",
    "fr_diazo",
    "fr_dihydropyridine",
    "fr_epoxide",
    "fr_ester",
    "fr_ether",
    "fr_furan",
    "fr_guanido",
    "fr_halogen",
    "fr_hdrzine",
    "fr_hdrzone",
    "fr_imidazole",
    "fr_imide",
    "fr_isocyan",
    "fr_isothiocyan",
    "fr_ketone",
    "fr_ketone_Topliss",
    "fr_lactam",
    "fr_lactone",
    "fr_methoxy",
    "fr_morpholine",
    "fr_nitrile",
    "fr_nitro",
    "fr_nitro_arom",
    "fr_nitro_arom_nonortho",
    "fr_nitroso",
    "fr_oxazole",
    "fr_oxime",
    "fr_para_hydroxylation",
    "fr_phenol",
    "fr_phenol_noOrthoHbond",
    "fr_phos_acid",
    "fr_phos_ester",
    "fr_piperdine",
    "fr_piperzine",
    "fr_priamide",
    "fr_prisulfonamd",
    "fr_pyridine",
    "fr_quatN",
    "fr_sulfide",
    "fr_sulfonamd",
    "fr_sulfone",
    "fr_term_acetylene",
    "fr_tetrazole",
    "fr_thiazole",
    "fr_thiocyan",
    "fr_thiophene",
    "fr_unbrch_alkane",
    "fr_urea",
];

/// Number of descriptor columns
pub const DESCRIPTOR_COUNT: usize = DESCRIPTOR_NAMES.len();

const HYDROGEN_MASS: f64 = 1.008;
const HYDROGEN_EXACT_MASS: f64 = 1.007_825_032;

static H_ACCEPTORS: PatternTable = PatternTable::new(&[(
    "NumHAcceptors",
    "[$([O,S;H1;v2]-[!$(*=[O,N,P,S])]),$([O,S;H0;v2]),$([O,S;-]),$([N;v3;!$(N-*=!@[O,N,P,S])]),$([nH0,o,s;+0]),$([F])]",
)]);

static H_DONORS: PatternTable = PatternTable::new(&[(
    "NumHDonors",
    "[$([N;!H0;v3]),$([N;!H0;+1;v4]),$([O,S;H1;+0]),$([n;H1;+0])]",
)]);

/// Strict rotor definition; amide C-N bonds and symmetric CX3 groups do not rotate
static ROTATABLE_BONDS: PatternTable = PatternTable::new(&[(
    "NumRotatableBonds",
    "[!$(*#*)&!D1&!$(C(F)(F)F)&!$(C(Cl)(Cl)Cl)&!$(C(Br)(Br)Br)&!$(C([CH3])([CH3])[CH3])&!$([CD3](=[N,O,S])-!@[#7,O,S!D1])&!$([#7,O,S!D1]-!@[CD3]=[N,O,S])&!$([CD3](=[N+])-!@[#7!D1])&!$([#7!D1]-!@[CD3]=[N+])]-,:;!@[!$(*#*)&!D1&!$(C(F)(F)F)&!$(C(Cl)(Cl)Cl)&!$(C(Br)(Br)Br)&!$(C([CH3])([CH3])[CH3])]",
)]);

static AMIDE_BONDS: PatternTable = PatternTable::new(&[("NumAmideBonds", "C(=[O;!R])N")]);

/// Per-atom quantities shared by several descriptor families
struct AtomProperties<'a> {
    target: MatchTarget<'a>,
    estate: Vec<f64>,
    charges: PartialCharges,
    crippen: Vec<(f64, f64)>,
    surface: SurfaceContributions,
    heavy: Vec<usize>,
}

impl<'a> AtomProperties<'a> {
    fn new(mol: &'a Molecule) -> Self {
        let target = MatchTarget::new(mol);
        let crippen = contrib::crippen_contributions(&target);
        Self {
            estate: topology::estate_indices(mol),
            charges: gasteiger_charges(mol),
            surface: surface::labute_contributions(mol),
            heavy: topology::heavy_atoms(mol).collect(),
            crippen,
            target,
        }
    }

    fn heavy_values(&self, values: impl Fn(usize) -> f64) -> Vec<f64> {
        self.heavy.iter().map(|&i| values(i)).collect()
    }

    /// Heavy-atom surface areas binned by a per-atom key
    fn vsa(&self, key: impl Fn(usize) -> f64, bins: &[f64]) -> Vec<f64> {
        let keys = self.heavy_values(key);
        let areas = self.heavy_values(|i| self.surface.atoms[i]);
        in_name_order(surface::bin_sums(&keys, &areas, bins))
    }
}

/// Compute every descriptor, in `DESCRIPTOR_NAMES` order
pub fn compute_descriptors(mol: &Molecule) -> Vec<f64> {
    let props = AtomProperties::new(mol);
    let heavy_estate = props.heavy_values(|i| props.estate[i]);
    let (min_charge, max_charge) = props.charges.range(mol);
    let chi = topology::chi_indices(mol);
    let (kappa1, kappa2, kappa3) = topology::kappa_indices(mol);
    let (avg_ipc, ipc) = topology::ipc(mol);
    let logp: f64 = props.crippen.iter().map(|c| c.0).sum();
    let mr: f64 = props.crippen.iter().map(|c| c.1).sum();
    let tpsa = contrib::tpsa(mol);
    let rings = RingCounts::of(mol);
    let centres = mol.stereocenters();
    let (spiro, bridgehead) = ring_junctions(mol);
    let donors = H_DONORS.count(&props.target) as f64;
    let rotatable = ROTATABLE_BONDS.count(&props.target) as f64;
    let weight = mol_wt(mol, false);

    let mut values = Vec::with_capacity(DESCRIPTOR_COUNT);
    values.push(fold(&heavy_estate, f64::max, f64::abs));
    values.push(fold(&heavy_estate, f64::max, |v| v));
    values.push(fold(&heavy_estate, f64::min, f64::abs));
    values.push(fold(&heavy_estate, f64::min, |v| v));
    values.push(qed::qed(&QedProperties {
        mw: weight,
        alogp: logp,
        hba: qed::acceptor_count(&props.target) as f64,
        hbd: donors,
        psa: tpsa,
        rotb: rotatable,
        arom: rings.fully_aromatic as f64,
        alerts: qed::alert_count(&props.target) as f64,
    }));
    values.push(spacial_score(mol));
    values.push(weight);
    values.push(mol_wt_heavy(mol));
    values.push(exact_mol_wt(mol));
    values.push(valence_electrons(mol) as f64);
    values.push(mol.atoms().iter().map(|a| a.radical_electrons as f64).sum());
    values.push(max_charge);
    values.push(min_charge);
    values.push(max_charge.abs().max(min_charge.abs()));
    values.push(max_charge.abs().min(min_charge.abs()));
    for radius in 1..=3 {
        values.push(fingerprint_density(mol, radius));
    }

    let masses: Vec<f64> = mol.atoms().iter().map(|a| a.mass()).collect();
    let logp_contribs: Vec<f64> = props.crippen.iter().map(|c| c.0).collect();
    let mr_contribs: Vec<f64> = props.crippen.iter().map(|c| c.1).collect();
    for weights in [&masses, &props.charges.atoms, &logp_contribs, &mr_contribs] {
        let (high, low) = bcut(mol, weights);
        values.push(high);
        values.push(low);
    }

    values.push(avg_ipc);
    values.push(topology::balaban_j(mol));
    values.push(topology::bertz_ct(mol));
    values.extend([
        chi.chi0, chi.chi0n, chi.chi0v, chi.chi1, chi.chi1n, chi.chi1v, chi.chi2n, chi.chi2v,
        chi.chi3n, chi.chi3v, chi.chi4n, chi.chi4v,
    ]);
    values.push(topology::hall_kier_alpha(mol));
    values.push(ipc);
    values.extend([kappa1, kappa2, kappa3]);
    values.push(props.surface.total());

    let charges = &props.charges;
    values.extend(props.vsa(|i| charges.atoms[i] + charges.hydrogens[i], &surface::PEOE_BINS));
    values.extend(props.vsa(|i| mr_contribs[i], &surface::SMR_BINS));
    values.extend(props.vsa(|i| logp_contribs[i], &surface::SLOGP_BINS));
    values.push(tpsa);
    values.extend(props.vsa(|i| props.estate[i], &surface::ESTATE_BINS));
    let areas = props.heavy_values(|i| props.surface.atoms[i]);
    values.extend(in_name_order(surface::bin_sums(&areas, &heavy_estate, &surface::VSA_BINS)));

    values.push(fraction_csp3(mol));
    values.push(mol.heavy_atom_count() as f64);
    values.push(count_atoms(mol, |i| is_n_or_o(mol, i), |i| mol.total_hydrogens(i)));
    values.push(count_atoms(mol, |i| is_n_or_o(mol, i), |_| 1));
    values.push(rings.aliphatic_carbocycles as f64);
    values.push(rings.aliphatic_heterocycles as f64);
    values.push((rings.aliphatic_carbocycles + rings.aliphatic_heterocycles) as f64);
    values.push(AMIDE_BONDS.count(&props.target) as f64);
    values.push(rings.aromatic_carbocycles as f64);
    values.push(rings.aromatic_heterocycles as f64);
    values.push((rings.aromatic_carbocycles + rings.aromatic_heterocycles) as f64);
    values.push(centres.len() as f64);
    values.push(bridgehead as f64);
    values.push(H_ACCEPTORS.count(&props.target) as f64);
    values.push(donors);
    values.push(count_atoms(mol, |i| !matches!(mol.atom(i).atomic_number, 1 | 6), |_| 1));
    values.push((rings.aromatic_heterocycles + rings.aliphatic_heterocycles) as f64);
    values.push(rotatable);
    values.push(rings.saturated_carbocycles as f64);
    values.push(rings.saturated_heterocycles as f64);
    values.push((rings.saturated_carbocycles + rings.saturated_heterocycles) as f64);
    values.push(spiro as f64);
    values.push(centres.iter().filter(|c| !c.specified).count() as f64);
    values.push(topology::phi(mol));
    values.push(mol.rings().len() as f64);
    values.push(logp);
    values.push(mr);
    values.extend(fragment_counts(&props.target).into_iter().map(|c| c as f64));

    debug_assert_eq!(values.len(), DESCRIPTOR_COUNT);
    values
}

/// Reorder bins numbered 1..=n into the lexicographic order of their
/// column names (1, 10, 11, 2, ...)
fn in_name_order(bins: Vec<f64>) -> Vec<f64> {
    let mut labels: Vec<usize> = (1..=bins.len()).collect();
    labels.sort_by_key(|i| i.to_string());
    labels.into_iter().map(|i| bins[i - 1]).collect()
}

/// Fold mapped values with `pick`, 0 for an empty slice
fn fold(values: &[f64], pick: fn(f64, f64) -> f64, map: fn(f64) -> f64) -> f64 {
    values.iter().map(|&v| map(v)).reduce(pick).unwrap_or(0.0)
}

fn count_atoms(mol: &Molecule, filter: impl Fn(usize) -> bool, weight: impl Fn(usize) -> usize) -> f64 {
    (0..mol.atom_count())
        .filter(|&i| filter(i))
        .map(weight)
        .sum::<usize>() as f64
}

fn is_n_or_o(mol: &Molecule, atom: usize) -> bool {
    matches!(mol.atom(atom).atomic_number, 7 | 8)
}

/// Average molecular weight; labelled atoms use their isotope mass
fn mol_wt(mol: &Molecule, heavy_only: bool) -> f64 {
    mol.atoms()
        .iter()
        .filter(|a| !heavy_only || a.is_heavy())
        .map(|a| {
            let hydrogens = if heavy_only { 0.0 } else { a.hydrogens as f64 * HYDROGEN_MASS };
            a.mass() + hydrogens
        })
        .sum()
}

fn mol_wt_heavy(mol: &Molecule) -> f64 {
    mol_wt(mol, true)
}

/// Monoisotopic molecular weight; labelled atoms use their isotope mass
fn exact_mol_wt(mol: &Molecule) -> f64 {
    mol.atoms()
        .iter()
        .map(|a| a.exact_mass() + a.hydrogens as f64 * HYDROGEN_EXACT_MASS)
        .sum()
}

fn valence_electrons(mol: &Molecule) -> i64 {
    mol.atoms()
        .iter()
        .map(|a| a.element().valence_electrons as i64 - a.formal_charge as i64 + a.hydrogens as i64)
        .sum()
}

/// Unique Morgan environments at `radius` per heavy atom
fn fingerprint_density(mol: &Molecule, radius: u32) -> f64 {
    let heavy = mol.heavy_atom_count();
    if heavy == 0 {
        return 0.0;
    }
    let mut ids = MorganFingerprint::environment_ids(mol, radius);
    ids.sort_unstable();
    ids.dedup();
    ids.len() as f64 / heavy as f64
}

fn is_sp3_carbon(mol: &Molecule, atom: usize) -> bool {
    let a = mol.atom(atom);
    a.atomic_number == 6
        && !a.is_aromatic
        && mol
            .neighbors(atom)
            .iter()
            .all(|&(_, b)| mol.bond(b).order == BondOrder::Single)
}

fn fraction_csp3(mol: &Molecule) -> f64 {
    let carbons = count_atoms(mol, |i| mol.atom(i).atomic_number == 6, |_| 1);
    if carbons == 0.0 {
        return 0.0;
    }
    count_atoms(mol, |i| is_sp3_carbon(mol, i), |_| 1) / carbons
}

/// Spacial score (Krzyzanowski et al. 2023) per heavy atom: hybridization,
/// stereo, ring and squared neighbour count multiplied per atom
fn spacial_score(mol: &Molecule) -> f64 {
    let heavy = mol.heavy_atom_count();
    if heavy == 0 {
        return 0.0;
    }
    let mut stereo_atoms: BTreeSet<usize> = mol.stereocenters().iter().map(|c| c.atom).collect();
    for bond in mol.stereo_double_bonds() {
        stereo_atoms.insert(mol.bond(bond).atom1);
        stereo_atoms.insert(mol.bond(bond).atom2);
    }

    let score: f64 = topology::heavy_atoms(mol)
        .map(|i| {
            let hybridization = match mol.total_degree(i) {
                d if d >= 5 => 4.0,
                4 => 3.0,
                _ => match topology::conjugated_hybridization(mol, i) {
                    Hybridization::Sp => 1.0,
                    Hybridization::Sp2 => 2.0,
                    Hybridization::Sp3 => 3.0,
                },
            };
            let stereo = if stereo_atoms.contains(&i) { 2.0 } else { 1.0 };
            let ring = if !mol.atom(i).is_aromatic && mol.is_ring_atom(i) { 2.0 } else { 1.0 };
            let neighbours = mol.heavy_degree(i) as f64;
            hybridization * stereo * ring * neighbours * neighbours
        })
        .sum();
    score / heavy as f64
}

/// (spiro atoms, bridgehead atoms) from pairs of SSSR rings
fn ring_junctions(mol: &Molecule) -> (usize, usize) {
    let rings = mol.rings();
    let bond_rings: Vec<Vec<usize>> = rings.iter().map(|r| mol.ring_bond_indices(r)).collect();
    let mut spiro = BTreeSet::new();
    let mut bridgehead = BTreeSet::new();

    for i in 0..rings.len() {
        for j in i + 1..rings.len() {
            let shared: Vec<usize> = rings[i].iter().filter(|a| rings[j].contains(a)).copied().collect();
            if shared.len() == 1 {
                spiro.insert(shared[0]);
            }

            let shared_bonds: Vec<usize> = bond_rings[i]
                .iter()
                .filter(|b| bond_rings[j].contains(b))
                .copied()
                .collect();
            if shared_bonds.len() > 1 {
                // Ends of the shared path are the bridgeheads
                let mut ends: BTreeMap<usize, usize> = BTreeMap::new();
                for &b in &shared_bonds {
                    let bond = mol.bond(b);
                    *ends.entry(bond.atom1).or_default() += 1;
                    *ends.entry(bond.atom2).or_default() += 1;
                }
                bridgehead.extend(ends.into_iter().filter(|&(_, n)| n == 1).map(|(a, _)| a));
            }
        }
    }
    (spiro.len(), bridgehead.len())
}

/// SSSR ring classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RingCounts {
    aromatic_carbocycles: usize,
    aromatic_heterocycles: usize,
    aliphatic_carbocycles: usize,
    aliphatic_heterocycles: usize,
    saturated_carbocycles: usize,
    saturated_heterocycles: usize,
    /// Rings made only of aromatic atoms
    fully_aromatic: usize,
}

impl RingCounts {
    fn of(mol: &Molecule) -> Self {
        let mut counts = RingCounts::default();
        for ring in mol.rings() {
            let orders: Vec<BondOrder> = mol
                .ring_bond_indices(ring)
                .into_iter()
                .map(|b| mol.bond(b).order)
                .collect();
            let carbocycle = ring.iter().all(|&a| mol.atom(a).atomic_number == 6);
            let aromatic = orders.iter().all(|&o| o == BondOrder::Aromatic);
            let saturated = orders.iter().all(|&o| o == BondOrder::Single);

            match (aromatic, carbocycle) {
                (true, true) => counts.aromatic_carbocycles += 1,
                (true, false) => counts.aromatic_heterocycles += 1,
                (false, true) => counts.aliphatic_carbocycles += 1,
                (false, false) => counts.aliphatic_heterocycles += 1,
            }
            match (saturated, carbocycle) {
                (true, true) => counts.saturated_carbocycles += 1,
                (true, false) => counts.saturated_heterocycles += 1,
                _ => {}
            }
            if ring.iter().all(|&a| mol.atom(a).is_aromatic) {
                counts.fully_aromatic += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molecule::parse_smiles;

    fn descriptor(smiles: &str, name: &str) -> f64 {
        let mol = parse_smiles(smiles).unwrap();
        let idx = DESCRIPTOR_NAMES.iter().position(|&n| n == name).unwrap();
        compute_descriptors(&mol)[idx]
    }

    fn family(smiles: &str, prefix: &str) -> f64 {
        let mol = parse_smiles(smiles).unwrap();
        DESCRIPTOR_NAMES
            .iter()
            .zip(compute_descriptors(&mol))
            .filter(|(name, _)| {
                name.strip_prefix(prefix)
                    .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
            })
            .map(|(_, v)| v)
            .sum()
    }

    #[test]
    fn test_descriptor_count_matches_names() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(compute_descriptors(&mol).len(), DESCRIPTOR_COUNT);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names = DESCRIPTOR_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DESCRIPTOR_COUNT);
    }

    #[test]
    fn test_rdkit_column_positions() {
        let position = |name: &str| DESCRIPTOR_NAMES.iter().position(|&n| n == name).unwrap();
        assert_eq!(position("qed"), 4);
        assert_eq!(position("MolWt"), 6);
        assert_eq!(position("BCUT2D_MWHI"), 18);
        assert_eq!(position("LabuteASA"), 46);
        assert_eq!(position("PEOE_VSA10"), position("PEOE_VSA1") + 1);
        assert_eq!(position("PEOE_VSA2"), position("PEOE_VSA14") + 1);
        assert_eq!(position("TPSA"), 83);
        assert_eq!(position("MolMR"), 131);
        assert_eq!(position("fr_Al_COO"), 132);
        assert_eq!(DESCRIPTOR_NAMES[DESCRIPTOR_COUNT - 1], "fr_urea");
    }

    #[test]
    fn test_in_name_order() {
        let bins: Vec<f64> = (1..=11).map(f64::from).collect();
        assert_eq!(
            in_name_order(bins),
            vec![1.0, 10.0, 11.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
        );
    }

    #[test]
    fn test_lookup_tables_compile() {
        for table in [&H_ACCEPTORS, &H_DONORS, &ROTATABLE_BONDS, &AMIDE_BONDS] {
            assert!(table.failures().is_empty());
        }
    }

    #[test]
    fn test_molecular_weight() {
        assert!((descriptor("CCO", "MolWt") - 46.069).abs() < 0.01);
        assert!((descriptor("CCO", "HeavyAtomMolWt") - 40.021).abs() < 0.01);
        assert!((descriptor("CCO", "ExactMolWt") - 46.0419).abs() < 0.001);
        assert!((descriptor("c1ccccc1", "MolWt") - 78.114).abs() < 0.01);
    }

    #[test]
    fn test_isotope_labels_change_mass() {
        let expected = 13.003_355 + 4.0 * 1.007_825;
        assert!((descriptor("[13CH4]", "ExactMolWt") - expected).abs() < 1e-4);
        assert!((descriptor("[13CH4]", "MolWt") - (13.003_355 + 4.0 * 1.008)).abs() < 1e-4);
        // Deuterium as an explicit atom
        assert!((descriptor("[2H]O[2H]", "ExactMolWt") - (2.0 * 2.014_102 + 15.994_915)).abs() < 1e-4);
    }

    #[test]
    fn test_valence_electrons() {
        // Ethanol: 2*4 + 6 + 6 H
        assert_eq!(descriptor("CCO", "NumValenceElectrons"), 20.0);
        assert_eq!(descriptor("[NH4+]", "NumValenceElectrons"), 8.0);
    }

    #[test]
    fn test_atom_counts() {
        assert_eq!(descriptor("CCO", "HeavyAtomCount"), 3.0);
        assert_eq!(descriptor("CCO", "NHOHCount"), 1.0);
        assert_eq!(descriptor("CCO", "NOCount"), 1.0);
        assert_eq!(descriptor("CC(=O)N", "NumHeteroatoms"), 2.0);
    }

    #[test]
    fn test_ring_counts() {
        assert_eq!(descriptor("c1ccccc1", "NumAromaticCarbocycles"), 1.0);
        assert_eq!(descriptor("c1ccncc1", "NumAromaticHeterocycles"), 1.0);
        assert_eq!(descriptor("c1ccncc1", "NumHeterocycles"), 1.0);
        assert_eq!(descriptor("C1CCCCC1", "NumSaturatedCarbocycles"), 1.0);
        assert_eq!(descriptor("C1CCOCC1", "NumSaturatedHeterocycles"), 1.0);
        assert_eq!(descriptor("C1=CCCCC1", "NumAliphaticCarbocycles"), 1.0);
        assert_eq!(descriptor("C1=CCCCC1", "NumSaturatedRings"), 0.0);
        assert_eq!(descriptor("c1ccc2ccccc2c1", "RingCount"), 2.0);
        assert_eq!(descriptor("CCO", "RingCount"), 0.0);
    }

    #[test]
    fn test_ring_junctions() {
        assert_eq!(descriptor("C1CCC2(CC1)CCCC2", "NumSpiroAtoms"), 1.0);
        assert_eq!(descriptor("C1CCC2(CC1)CCCC2", "NumBridgeheadAtoms"), 0.0);
        assert_eq!(descriptor("C1CC2CCC1C2", "NumBridgeheadAtoms"), 2.0);
        // Fused rings share one bond: neither spiro nor bridged
        assert_eq!(descriptor("C1CCC2CCCCC2C1", "NumBridgeheadAtoms"), 0.0);
        assert_eq!(descriptor("C1CCC2CCCCC2C1", "NumSpiroAtoms"), 0.0);
    }

    #[test]
    fn test_stereo_centres() {
        assert_eq!(descriptor("C[C@H](O)CC", "NumAtomStereoCenters"), 1.0);
        assert_eq!(descriptor("C[C@H](O)CC", "NumUnspecifiedAtomStereoCenters"), 0.0);
        assert_eq!(descriptor("CC(O)CC", "NumUnspecifiedAtomStereoCenters"), 1.0);
        assert_eq!(descriptor("CCO", "NumAtomStereoCenters"), 0.0);
    }

    #[test]
    fn test_hydrogen_bonding() {
        assert_eq!(descriptor("CCO", "NumHDonors"), 1.0);
        assert_eq!(descriptor("CCO", "NumHAcceptors"), 1.0);
        assert_eq!(descriptor("c1ccncc1", "NumHAcceptors"), 1.0);
        assert_eq!(descriptor("c1cc[nH]c1", "NumHDonors"), 1.0);
        assert_eq!(descriptor("c1cc[nH]c1", "NumHAcceptors"), 0.0);
        // Amide nitrogen is not an acceptor; carbonyl oxygen is
        assert_eq!(descriptor("CC(=O)N", "NumHAcceptors"), 1.0);
        // Acid hydroxyl is excluded, carbonyl oxygen counts
        assert_eq!(descriptor("CC(=O)O", "NumHAcceptors"), 1.0);
    }

    #[test]
    fn test_rotatable_bonds() {
        assert_eq!(descriptor("CCCC", "NumRotatableBonds"), 1.0);
        assert_eq!(descriptor("CCO", "NumRotatableBonds"), 0.0);
        assert_eq!(descriptor("c1ccccc1CCC", "NumRotatableBonds"), 2.0);
        assert_eq!(descriptor("CC#CC", "NumRotatableBonds"), 0.0);
        // Amide C-N is not a rotor
        assert_eq!(descriptor("CCC(=O)NC", "NumRotatableBonds"), 1.0);
    }

    #[test]
    fn test_amide_bonds() {
        assert_eq!(descriptor("CC(=O)NC", "NumAmideBonds"), 1.0);
        assert_eq!(descriptor("CC(=O)OC", "NumAmideBonds"), 0.0);
    }

    #[test]
    fn test_fraction_csp3() {
        assert_eq!(descriptor("C1CCCCC1", "FractionCSP3"), 1.0);
        assert_eq!(descriptor("c1ccccc1", "FractionCSP3"), 0.0);
        assert_eq!(descriptor("Cc1ccccc1", "FractionCSP3"), 1.0 / 7.0);
    }

    #[test]
    fn test_fragment_columns() {
        let aspirin = "CC(=O)Oc1ccccc1C(=O)O";
        assert_eq!(descriptor(aspirin, "fr_COO"), 1.0);
        assert_eq!(descriptor(aspirin, "fr_C_O"), 2.0);
        assert_eq!(descriptor(aspirin, "fr_ether"), 1.0);
        assert_eq!(descriptor(aspirin, "fr_benzene"), 1.0);
        assert_eq!(descriptor(aspirin, "fr_Al_OH"), 0.0);
        assert_eq!(descriptor("Oc1ccccc1", "fr_Ar_OH"), 1.0);
        assert_eq!(descriptor("CCO", "fr_Al_OH"), 1.0);

        let misc = "NCCC#N.ClCBr.CC(=O)C";
        assert_eq!(descriptor(misc, "fr_NH2"), 1.0);
        assert_eq!(descriptor(misc, "fr_nitrile"), 1.0);
        assert_eq!(descriptor(misc, "fr_halogen"), 2.0);
        assert_eq!(descriptor(misc, "fr_ketone"), 1.0);
    }

    #[test]
    fn test_fingerprint_density() {
        // Benzene: two unique environments at radius 1 over six atoms
        assert!((descriptor("c1ccccc1", "FpDensityMorgan1") - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_estate_extremes() {
        let max = descriptor("CCO", "MaxEStateIndex");
        let min = descriptor("CCO", "MinEStateIndex");
        assert!(max > min);
        assert!(descriptor("CCO", "MaxAbsEStateIndex") >= max.abs());
    }

    #[test]
    fn test_partial_charge_extremes() {
        let max = descriptor("CCO", "MaxPartialCharge");
        let min = descriptor("CCO", "MinPartialCharge");
        assert!(min < 0.0 && max > 0.0);
        assert_eq!(descriptor("CCO", "MaxAbsPartialCharge"), min.abs().max(max.abs()));
        assert_eq!(descriptor("CCO", "MinAbsPartialCharge"), min.abs().min(max.abs()));
    }

    #[test]
    fn test_bcut_orders_high_above_low() {
        let smiles = "CC(=O)Oc1ccccc1C(=O)O";
        for (high, low) in [
            ("BCUT2D_MWHI", "BCUT2D_MWLOW"),
            ("BCUT2D_CHGHI", "BCUT2D_CHGLO"),
            ("BCUT2D_LOGPHI", "BCUT2D_LOGPLOW"),
            ("BCUT2D_MRHI", "BCUT2D_MRLOW"),
        ] {
            assert!(descriptor(smiles, high) > descriptor(smiles, low), "{high}");
        }
    }

    #[test]
    fn test_vsa_families_partition_heavy_surface() {
        let smiles = "CC(=O)Oc1ccccc1C(=O)O";
        let mol = parse_smiles(smiles).unwrap();
        let heavy_surface: f64 = surface::labute_contributions(&mol).atoms.iter().sum();
        for prefix in ["PEOE_VSA", "SMR_VSA", "SlogP_VSA", "EState_VSA"] {
            assert!((family(smiles, prefix) - heavy_surface).abs() < 1e-9, "{prefix}");
        }
        assert!(descriptor(smiles, "LabuteASA") > heavy_surface);
    }

    #[test]
    fn test_labute_benzene() {
        assert!((descriptor("c1ccccc1", "LabuteASA") - 37.43).abs() < 0.01);
    }

    #[test]
    fn test_spacial_score() {
        // Every aromatic carbon: sp2, two neighbours
        assert!((descriptor("c1ccccc1", "SPS") - 8.0).abs() < 1e-12);
        // Stereo centre doubles its own term
        let plain = descriptor("CC(O)CC", "SPS");
        assert!(plain > 0.0);
        assert_eq!(descriptor("C[C@H](O)CC", "SPS"), plain);
        assert!(descriptor("CC(C)(O)CC", "SPS") > 0.0);
    }

    #[test]
    fn test_qed_range() {
        let aspirin = descriptor("CC(=O)Oc1ccccc1C(=O)O", "qed");
        assert!(aspirin > 0.4 && aspirin < 0.7, "{aspirin}");
        assert!(descriptor("C", "qed") > 0.0);
    }

    #[test]
    fn test_ipc_and_phi() {
        assert!(descriptor("CCC", "AvgIpc") > 0.0);
        assert!(descriptor("CCC", "Ipc") > descriptor("CCC", "AvgIpc"));
        assert!((descriptor("CCC", "Phi") - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_values_are_finite() {
        for smiles in ["C", "[Na+].[Cl-]", "c1ccc2ccccc2c1", "[H][H]", "*", "CC(=O)Oc1ccccc1C(=O)O"] {
            let mol = parse_smiles(smiles).unwrap();
            for (name, v) in DESCRIPTOR_NAMES.iter().zip(compute_descriptors(&mol)) {
                assert!(v.is_finite(), "{} is not finite for {}", name, smiles);
            }
        }
    }
}
