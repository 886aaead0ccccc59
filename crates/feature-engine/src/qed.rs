//! Quantitative Estimate of Drug-likeness
//!
//! Bickerton et al. 2012: eight properties are mapped through asymmetric
//! double sigmoid desirability functions and combined as a weighted
//! geometric mean using the mean weights.

use crate::patterns::PatternTable;
use molecule::MatchTarget;

/// Asymmetric double sigmoid (a, b, c, d, e, f, dmax) per property
const ADS_PARAMETERS: [[f64; 7]; 8] = [
    // MW
    [2.817065973, 392.5754953, 290.7489764, 2.419764353, 49.22325677, 65.37051707, 104.9805561],
    // ALOGP
    [3.172690585, 137.8624751, 2.534937431, 4.581497897, 0.822739154, 0.576295591, 131.3186604],
    // HBA
    [2.948620388, 160.4605972, 3.615294657, 4.435986202, 0.290141953, 1.300669958, 148.7763046],
    // HBD
    [1.618662227, 1010.051101, 0.985094388, 0.000000001, 0.713820843, 0.920922555, 258.1632616],
    // PSA
    [1.876861559, 125.2232657, 62.90773554, 87.83366614, 12.01999824, 28.51324732, 104.5686167],
    // ROTB
    [0.010000000, 272.4121427, 2.558379970, 1.565547684, 1.271567166, 2.758063707, 105.4420403],
    // AROM
    [3.217788970, 957.7374108, 2.274627939, 0.000000001, 1.317690384, 0.375760881, 312.3372610],
    // ALERTS
    [0.010000000, 1199.094025, -0.09002883, 0.000000001, 0.185904477, 0.875193782, 417.7253140],
];

const MEAN_WEIGHTS: [f64; 8] = [0.66, 0.46, 0.05, 0.61, 0.06, 0.65, 0.48, 0.95];

/// Raw QED inputs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QedProperties {
    pub mw: f64,
    pub alogp: f64,
    pub hba: f64,
    pub hbd: f64,
    pub psa: f64,
    pub rotb: f64,
    pub arom: f64,
    pub alerts: f64,
}

impl QedProperties {
    fn as_array(&self) -> [f64; 8] {
        [
            self.mw, self.alogp, self.hba, self.hbd, self.psa, self.rotb, self.arom, self.alerts,
        ]
    }
}

static ACCEPTORS: PatternTable = PatternTable::new(&[
    ("oxygen", "[oH0;X2]"),
    ("hydroxyl", "[OH1;X2;v2]"),
    ("ether", "[OH0;X2;v2]"),
    ("carbonyl", "[OH0;X1;v2]"),
    ("oxide", "[O-;X1]"),
    ("thioether", "[SH0;X2;v2]"),
    ("thione", "[SH0;X1;v2]"),
    ("thiolate", "[S-;X1]"),
    ("imine", "[nH0;X2]"),
    ("nitrile", "[NH0;X1;v3]"),
    ("amine", "[$([N;+0;X3;v3]);!$(N[C,S]=O)]"),
]);

static ALERTS: PatternTable = PatternTable::new(&[
    ("alert", "*1[O,S,N]*1"),
    ("alert", "[S,C](=[O,S])[F,Br,Cl,I]"),
    ("alert", "[CX4][Cl,Br,I]"),
    ("alert", "[#6]S(=O)(=O)O[#6]"),
    ("alert", "[$([CH]),$(CC)]#CC(=O)[#6]"),
    ("alert", "[$([CH]),$(CC)]#CC(=O)O[#6]"),
    ("alert", "n[OH]"),
    ("alert", "[$([CH]),$(CC)]#CS(=O)(=O)[#6]"),
    ("alert", "C=C(C=O)C=O"),
    ("alert", "n1c([F,Cl,Br,I])cccc1"),
    ("alert", "[CH1](=O)"),
    ("alert", "[#8][#8]"),
    ("alert", "[C;!R]=[N;!R]"),
    ("alert", "[N!R]=[N!R]"),
    ("alert", "[#6](=O)[#6](=O)"),
    ("alert", "[#16][#16]"),
    ("alert", "[#7][NH2]"),
    ("alert", "C(=O)N[NH2]"),
    ("alert", "[#6]=S"),
    ("alert", "[$([CH2]),$([CH][CX4]),$(C([CX4])[CX4])]=[$([CH2]),$([CH][CX4]),$(C([CX4])[CX4])]"),
    ("alert", "C1(=[O,N])C=CC(=[O,N])C=C1"),
    ("alert", "C1(=[O,N])C(=[O,N])C=CC=C1"),
    ("alert", "a21aa3a(aa1aaaa2)aaaa3"),
    ("alert", "a31a(a2a(aa1)aaaa2)aaaa3"),
    ("alert", "a1aa2a3a(a1)A=AA=A3=AA=A2"),
    ("alert", "c1cc([NH2])ccc1"),
    ("alert", "[Hg,Fe,As,Sb,Zn,Se,se,Te,B,Si,Na,Ca,Ge,Ag,Mg,K,Ba,Sr,Be,Ti,Mo,Mn,Ru,Pd,Ni,Cu,Au,Cd,Al,Ga,Sn,Rh,Tl,Bi,Nb,Li,Pb,Hf,Ho]"),
    ("alert", "I"),
    ("alert", "OS(=O)(=O)[O-]"),
    ("alert", "[N+](=O)[O-]"),
    ("alert", "C(=O)N[OH]"),
    ("alert", "C1NC(=O)NC(=O)1"),
    ("alert", "[SH]"),
    ("alert", "[S-]"),
    ("alert", "c1ccc([Cl,Br,I,F])c([Cl,Br,I,F])c1[Cl,Br,I,F]"),
    ("alert", "c1cc([Cl,Br,I,F])cc([Cl,Br,I,F])c1[Cl,Br,I,F]"),
    ("alert", "[CR1]1[CR1][CR1][CR1][CR1][CR1][CR1]1"),
    ("alert", "[CR1]1[CR1][CR1]cc[CR1][CR1]1"),
    ("alert", "[CR2]1[CR2][CR2][CR2][CR2][CR2][CR2][CR2]1"),
    ("alert", "[CR2]1[CR2][CR2]cc[CR2][CR2][CR2]1"),
    ("alert", "[CH2R2]1N[CH2R2][CH2R2][CH2R2][CH2R2][CH2R2]1"),
    ("alert", "[CH2R2]1N[CH2R2][CH2R2][CH2R2][CH2R2][CH2R2][CH2R2]1"),
    ("alert", "C#C"),
    ("alert", "[OR2,NR2]@[CR2]@[CR2]@[OR2,NR2]@[CR2]@[CR2]@[OR2,NR2]"),
    ("alert", "[$([N+R]),$([n+R]),$([N+]=C)][O-]"),
    ("alert", "[#6]=N[OH]"),
    ("alert", "[#6]=NOC=O"),
    ("alert", "[#6](=O)[CX4,CR0X3,O][#6](=O)"),
    ("alert", "c1ccc2c(c1)ccc(=O)o2"),
    ("alert", "[O+,o+,S+,s+]"),
    ("alert", "N=C=O"),
    ("alert", "[NX3,NX4][F,Cl,Br,I]"),
    ("alert", "c1ccccc1OC(=O)[#6]"),
    ("alert", "[CR0]=[CR0][CR0]=[CR0]"),
    ("alert", "[C+,c+,C-,c-]"),
    ("alert", "N=[N+]=[N-]"),
    ("alert", "C12C(NC(N1)=O)CSC2"),
    ("alert", "c1c([OH])c([OH,NH2,NH])ccc1"),
    ("alert", "P"),
    ("alert", "[N,O,S]C#N"),
    ("alert", "C=C=O"),
    ("alert", "[Si][F,Cl,Br,I]"),
    ("alert", "[SX2]O"),
    ("alert", "[SiR0,CR0](c1ccccc1)(c2ccccc2)(c3ccccc3)"),
    ("alert", "O1CCCCC1OC2CCC3CCCCC3C2"),
    ("alert", "N=[CR0][N,n,O,S]"),
    ("alert", "[cR2]1[cR2][cR2]([Nv3X3,Nv4X4])[cR2][cR2][cR2]1[cR2]2[cR2][cR2][cR2]([Nv3X3,Nv4X4])[cR2][cR2]2"),
    ("alert", "C=[C!r]C#N"),
    ("alert", "[cR2]1[cR2]c([N+0X3R0,nX3R0])c([N+0X3R0,nX3R0])[cR2][cR2]1"),
    ("alert", "[cR2]1[cR2]c([N+0X3R0,nX3R0])[cR2]c([N+0X3R0,nX3R0])[cR2]1"),
    ("alert", "[cR2]1[cR2]c([N+0X3R0,nX3R0])[cR2][cR2]c1([N+0X3R0,nX3R0])"),
    ("alert", "[OH]c1ccc([OH,NH2,NH])cc1"),
    ("alert", "c1ccccc1OC(=O)O"),
    ("alert", "[SX2H0][N]"),
    ("alert", "c12ccccc1(SC(S)=N2)"),
    ("alert", "c12ccccc1(SC(=S)N2)"),
    ("alert", "c1nnnn1C=O"),
    ("alert", "s1c(S)nnc1NC=O"),
    ("alert", "S1C=CSC1=S"),
    ("alert", "C(=O)Onnn"),
    ("alert", "OS(=O)(=O)C(F)(F)F"),
    ("alert", "N#CC[OH]"),
    ("alert", "N#CC(=O)"),
    ("alert", "S(=O)(=O)C#N"),
    ("alert", "N[CH2]C#N"),
    ("alert", "C1(=O)NCC1"),
    ("alert", "S(=O)(=O)[O-,OH]"),
    ("alert", "NC[F,Cl,Br,I]"),
    ("alert", "C=[C!r]O"),
    ("alert", "[NX2+0]=[O+0]"),
    ("alert", "[OR0,NR0][OR0,NR0]"),
    ("alert", "C(=O)O[C,H1].C(=O)O[C,H1].C(=O)O[C,H1]"),
    ("alert", "[CX2R0][NX3R0]"),
    ("alert", "c1ccccc1[C;!R]=[C;!R]c2ccccc2"),
    ("alert", "[NX3R0,NX4R0,OR0,SX2R0][CX4][NX3R0,NX4R0,OR0,SX2R0]"),
    ("alert", "[s,S,c,C,n,N,o,O]~[n+,N+](~[s,S,c,C,n,N,o,O])(~[s,S,c,C,n,N,o,O])~[s,S,c,C,n,N,o,O]"),
    ("alert", "[s,S,c,C,n,N,o,O]~[nX3+,NX3+](~[s,S,c,C,n,N])~[s,S,c,C,n,N]"),
    ("alert", "[*]=[N+]=[*]"),
    ("alert", "[SX3](=O)[O-,OH]"),
    ("alert", "N#N"),
    ("alert", "F.F.F.F"),
    ("alert", "[R0;D2][R0;D2][R0;D2][R0;D2]"),
    ("alert", "[cR,CR]~C(=O)NC(=O)~[cR,CR]"),
    ("alert", "C=!@CC=[O,S]"),
    ("alert", "[#6,#8,#16][#6](=O)O[#6]"),
    ("alert", "c[C;R0](=[O,S])[#6]"),
    ("alert", "c[SX2][C;!R]"),
    ("alert", "C=C=C"),
    ("alert", "c1nc([F,Cl,Br,I,S])ncc1"),
    ("alert", "c1ncnc([F,Cl,Br,I,S])c1"),
    ("alert", "c1nc(c2c(n1)nc(n2)[F,Cl,Br,I])"),
    ("alert", "[#6]S(=O)(=O)c1ccc(cc1)F"),
    ("alert", "[15N]"),
    ("alert", "[13C]"),
    ("alert", "[18O]"),
    ("alert", "[34S]"),
]);

/// Acceptor matches summed over the acceptor patterns
pub(crate) fn acceptor_count(target: &MatchTarget) -> usize {
    ACCEPTORS.counts(target).into_iter().sum()
}

/// Number of structural alert patterns present at least once
pub(crate) fn alert_count(target: &MatchTarget) -> usize {
    ALERTS
        .patterns()
        .iter()
        .flatten()
        .filter(|pattern| pattern.has_match(target))
        .count()
}

fn desirability(x: f64, [a, b, c, d, e, f, dmax]: [f64; 7]) -> f64 {
    let rising = 1.0 + (-(x - c + d / 2.0) / e).exp();
    let falling = 1.0 + (-(x - c - d / 2.0) / f).exp();
    (a + b / rising * (1.0 - 1.0 / falling)) / dmax
}

/// Weighted QED over the given properties
pub fn qed(properties: &QedProperties) -> f64 {
    let values = properties.as_array();
    let mut log_sum = 0.0;
    for i in 0..8 {
        let d = desirability(values[i], ADS_PARAMETERS[i]).max(1e-12);
        log_sum += MEAN_WEIGHTS[i] * d.ln();
    }
    (log_sum / MEAN_WEIGHTS.iter().sum::<f64>()).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use molecule::parse_smiles;

    #[test]
    fn test_tables_compile() {
        assert!(ACCEPTORS.failures().is_empty(), "{:?}", ACCEPTORS.failures());
        assert!(ALERTS.failures().is_empty());
        assert_eq!(ALERTS.len(), 116);
    }

    #[test]
    fn test_desirability_peaks_near_one() {
        // Each function is normalized by its maximum
        let peak = |i: usize, range: std::ops::Range<i32>| {
            range
                .map(|x| desirability(x as f64 * 0.5, ADS_PARAMETERS[i]))
                .fold(0.0, f64::max)
        };
        assert!((peak(0, 400..1000) - 1.0).abs() < 0.01);
        assert!((peak(1, -10..20) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_qed_is_a_fraction() {
        let drug_like = QedProperties {
            mw: 300.0,
            alogp: 2.5,
            hba: 3.0,
            hbd: 1.0,
            psa: 60.0,
            rotb: 3.0,
            arom: 1.0,
            alerts: 0.0,
        };
        let score = qed(&drug_like);
        assert!(score > 0.7 && score < 1.0, "{score}");

        let poor = QedProperties {
            mw: 900.0,
            alogp: 8.0,
            hba: 15.0,
            hbd: 8.0,
            psa: 250.0,
            rotb: 20.0,
            arom: 6.0,
            alerts: 5.0,
        };
        assert!(qed(&poor) < 0.1);
    }

    #[test]
    fn test_acceptors_and_alerts() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let target = MatchTarget::new(&mol);
        assert_eq!(acceptor_count(&target), 4);
        // Phenyl ester alert plus the generic ester alert
        assert_eq!(alert_count(&target), 2);

        let mol = parse_smiles("CCCCCC").unwrap();
        assert_eq!(alert_count(&MatchTarget::new(&mol)), 1);
    }
}
