//! Periodic Table Data
//!
//! Masses, outer-shell electron counts and default valences for the elements
//! the SMILES reader accepts, plus isotope masses and bond radii.

/// Static data for a single element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// Element symbol (e.g. "C", "Cl")
    pub symbol: &'static str,
    /// Atomic number (0 for the `*` wildcard)
    pub atomic_number: u8,
    /// Standard atomic weight
    pub average_mass: f64,
    /// Mass of the most abundant isotope
    pub monoisotopic_mass: f64,
    /// Number of outer-shell electrons
    pub valence_electrons: u8,
    /// Allowed valences, lowest first; empty means unchecked
    pub default_valences: &'static [u8],
}

const fn el(
    symbol: &'static str,
    atomic_number: u8,
    average_mass: f64,
    monoisotopic_mass: f64,
    valence_electrons: u8,
    default_valences: &'static [u8],
) -> Element {
    Element {
        symbol,
        atomic_number,
        average_mass,
        monoisotopic_mass,
        valence_electrons,
        default_valences,
    }
}

/// Wildcard atom (`*`)
pub static WILDCARD: Element = el("*", 0, 0.0, 0.0, 0, &[]);

static ELEMENTS: &[Element] = &[
    el("H", 1, 1.008, 1.007_825_032_23, 1, &[1]),
    el("He", 2, 4.003, 4.002_603_254, 2, &[0]),
    el("Li", 3, 6.941, 7.016_003_437, 1, &[1]),
    el("Be", 4, 9.012, 9.012_183_065, 2, &[2]),
    el("B", 5, 10.812, 11.009_305_36, 3, &[3]),
    el("C", 6, 12.011, 12.0, 4, &[4]),
    el("N", 7, 14.007, 14.003_074_004_43, 5, &[3, 5]),
    el("O", 8, 15.999, 15.994_914_619_56, 6, &[2]),
    el("F", 9, 18.998, 18.998_403_162_73, 7, &[1]),
    el("Ne", 10, 20.18, 19.992_440_176, 8, &[0]),
    el("Na", 11, 22.99, 22.989_769_282, 1, &[1]),
    el("Mg", 12, 24.305, 23.985_041_697, 2, &[2]),
    el("Al", 13, 26.982, 26.981_538_53, 3, &[3]),
    el("Si", 14, 28.086, 27.976_926_535, 4, &[4]),
    el("P", 15, 30.974, 30.973_761_998, 5, &[3, 5]),
    el("S", 16, 32.067, 31.972_071_174, 6, &[2, 4, 6]),
    el("Cl", 17, 35.453, 34.968_852_682, 7, &[1]),
    el("Ar", 18, 39.948, 39.962_383_124, 8, &[0]),
    el("K", 19, 39.098, 38.963_706_486, 1, &[1]),
    el("Ca", 20, 40.078, 39.962_590_863, 2, &[2]),
    el("Sc", 21, 44.956, 44.955_908_28, 3, &[]),
    el("Ti", 22, 47.867, 47.947_941_98, 4, &[]),
    el("V", 23, 50.942, 50.943_957_04, 5, &[]),
    el("Cr", 24, 51.996, 51.940_506_23, 6, &[]),
    el("Mn", 25, 54.938, 54.938_043_91, 7, &[]),
    el("Fe", 26, 55.845, 55.934_936_33, 8, &[]),
    el("Co", 27, 58.933, 58.933_194_29, 9, &[]),
    el("Ni", 28, 58.693, 57.935_342_41, 10, &[]),
    el("Cu", 29, 63.546, 62.929_597_72, 11, &[]),
    el("Zn", 30, 65.39, 63.929_142_01, 2, &[]),
    el("Ga", 31, 69.723, 68.925_573_5, 3, &[3]),
    el("Ge", 32, 72.61, 73.921_177_761, 4, &[4]),
    el("As", 33, 74.922, 74.921_594_57, 5, &[3, 5]),
    el("Se", 34, 78.96, 79.916_521_8, 6, &[2, 4, 6]),
    el("Br", 35, 79.904, 78.918_337_6, 7, &[1]),
    el("Kr", 36, 83.8, 83.911_497_728, 8, &[0]),
    el("Rb", 37, 85.468, 84.911_789_738, 1, &[1]),
    el("Sr", 38, 87.62, 87.905_612_5, 2, &[2]),
    el("Y", 39, 88.906, 88.905_840_3, 3, &[]),
    el("Zr", 40, 91.224, 89.904_697_7, 4, &[]),
    el("Nb", 41, 92.906, 92.906_373, 5, &[]),
    el("Mo", 42, 95.94, 97.905_404_82, 6, &[]),
    el("Tc", 43, 98.0, 97.907_212_4, 7, &[]),
    el("Ru", 44, 101.07, 101.904_344_1, 8, &[]),
    el("Rh", 45, 102.906, 102.905_498, 9, &[]),
    el("Pd", 46, 106.42, 105.903_480_4, 10, &[]),
    el("Ag", 47, 107.868, 106.905_091_6, 11, &[]),
    el("Cd", 48, 112.412, 113.903_365_09, 2, &[]),
    el("In", 49, 114.818, 114.903_878_776, 3, &[3]),
    el("Sn", 50, 118.711, 119.902_201_63, 4, &[2, 4]),
    el("Sb", 51, 121.76, 120.903_812, 5, &[3, 5]),
    el("Te", 52, 127.6, 129.906_222_748, 6, &[2, 4, 6]),
    el("I", 53, 126.904, 126.904_471_9, 7, &[1, 3, 5]),
    el("Xe", 54, 131.29, 131.904_155_086, 8, &[0, 2, 4, 6]),
    el("Cs", 55, 132.905, 132.905_451_961, 1, &[1]),
    el("Ba", 56, 137.328, 137.905_247, 2, &[2]),
    el("Ho", 67, 164.93, 164.930_328_8, 3, &[]),
    el("Hf", 72, 178.49, 179.946_557, 4, &[]),
    el("Pt", 78, 195.078, 194.964_791_7, 10, &[]),
    el("Au", 79, 196.967, 196.966_568_79, 11, &[]),
    el("Hg", 80, 200.59, 201.970_643_4, 2, &[]),
    el("Tl", 81, 204.383, 204.974_427_5, 3, &[]),
    el("Pb", 82, 207.2, 207.976_652_5, 4, &[2, 4]),
    el("Bi", 83, 208.98, 208.980_399_1, 5, &[3, 5]),
];

/// Look up an element by its symbol (case-sensitive)
pub fn by_symbol(symbol: &str) -> Option<&'static Element> {
    if symbol == "*" {
        return Some(&WILDCARD);
    }
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Look up an element by atomic number
pub fn by_number(atomic_number: u8) -> Option<&'static Element> {
    if atomic_number == 0 {
        return Some(&WILDCARD);
    }
    ELEMENTS.iter().find(|e| e.atomic_number == atomic_number)
}

/// Exact masses of the isotopes commonly written in labelled SMILES
static ISOTOPES: &[(u8, u16, f64)] = &[
    (1, 1, 1.007_825_032_23),
    (1, 2, 2.014_101_778_12),
    (1, 3, 3.016_049_281_9),
    (6, 11, 11.011_433_6),
    (6, 12, 12.0),
    (6, 13, 13.003_354_835_07),
    (6, 14, 14.003_241_988_4),
    (7, 13, 13.005_738_61),
    (7, 14, 14.003_074_004_43),
    (7, 15, 15.000_108_898_88),
    (8, 15, 15.003_065_6),
    (8, 16, 15.994_914_619_56),
    (8, 17, 16.999_131_756_5),
    (8, 18, 17.999_159_612_86),
    (9, 18, 18.000_938_0),
    (9, 19, 18.998_403_162_73),
    (15, 31, 30.973_761_998),
    (15, 32, 31.973_907_64),
    (15, 33, 32.971_725_7),
    (16, 32, 31.972_071_174),
    (16, 33, 32.971_458_909),
    (16, 34, 33.967_867_004),
    (16, 35, 34.969_032_32),
    (16, 36, 35.967_080_71),
    (17, 35, 34.968_852_682),
    (17, 36, 35.968_306_81),
    (17, 37, 36.965_902_602),
    (35, 79, 78.918_337_6),
    (35, 81, 80.916_290_6),
    (53, 123, 122.905_589),
    (53, 124, 123.906_209_9),
    (53, 125, 124.904_630_2),
    (53, 127, 126.904_471_9),
    (53, 131, 130.906_126_3),
];

/// Exact mass of an isotope.
///
/// Isotopes outside the table fall back to their mass number, which is
/// within 0.1 u for every nuclide lighter than lead.
pub fn isotope_mass(atomic_number: u8, mass_number: u16) -> f64 {
    ISOTOPES
        .iter()
        .find(|&&(z, a, _)| z == atomic_number && a == mass_number)
        .map(|&(_, _, mass)| mass)
        .unwrap_or(mass_number as f64)
}

/// Bond radius in angstroms, used for approximate atomic surface areas
pub fn bond_radius(atomic_number: u8) -> f64 {
    match atomic_number {
        1 => 0.33,
        3 => 1.23,
        4 => 0.90,
        5 => 0.82,
        6 => 0.77,
        7 => 0.70,
        8 => 0.66,
        9 => 0.611,
        11 => 1.54,
        12 => 1.36,
        13 => 1.18,
        14 => 0.937,
        15 => 0.89,
        16 => 1.04,
        17 => 0.997,
        19 => 2.03,
        20 => 1.74,
        26 => 1.17,
        29 => 1.17,
        30 => 1.25,
        31 => 1.26,
        32 => 1.22,
        33 => 1.21,
        34 => 1.17,
        35 => 1.141,
        50 => 1.40,
        51 => 1.41,
        52 => 1.37,
        53 => 1.333,
        _ => 1.5,
    }
}

/// Whether the element sits in the p-block groups 13-17
fn is_p_block(atomic_number: u8) -> bool {
    matches!(atomic_number, 5..=9 | 13..=17 | 31..=35 | 49..=53)
}

/// Allowed valences for an atom carrying a formal charge.
///
/// Charged p-block atoms take the valences of their isoelectronic neighbour
/// (N+ behaves like C, O- like F). Other charged atoms are unchecked.
pub fn allowed_valences(atomic_number: u8, formal_charge: i8) -> &'static [u8] {
    if formal_charge == 0 {
        return by_number(atomic_number).map(|e| e.default_valences).unwrap_or(&[]);
    }
    if !is_p_block(atomic_number) {
        return &[];
    }
    let shifted = atomic_number as i16 - formal_charge as i16;
    if !(1..=u8::MAX as i16).contains(&shifted) {
        return &[];
    }
    by_number(shifted as u8).map(|e| e.default_valences).unwrap_or(&[])
}
