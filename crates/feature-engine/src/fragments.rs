//! Functional Group Counts
//!
//! `fr_*` descriptors: unique substructure matches of one SMARTS pattern
//! each, in column order.

use crate::patterns::PatternTable;
use molecule::MatchTarget;

pub(crate) static FRAGMENTS: PatternTable = PatternTable::new(&[
    ("fr_Al_COO", "C-C(=O)[O;H1,-1]"),
    ("fr_Al_OH", "[C!$(C=O)]-[OH]"),
    ("fr_Al_OH_noTert", "[C;!$(C=O);!H0]-[OH]"),
    ("fr_ArN", "[$(a-[NX3;H2,H1;!$(NC=O)]),$(a-[NX3;H0;!$(NC=O)])]"),
    ("fr_Ar_COO", "c-C(=O)[O;H1,-1]"),
    ("fr_Ar_N", "n"),
    ("fr_Ar_NH", "[nH]"),
    ("fr_Ar_OH", "c[OH1]"),
    ("fr_COO", "[#6]C(=O)[O;H,-1]"),
    ("fr_COO2", "[CX3](=O)[OX1H0-,OX2H1]"),
    ("fr_C_O", "[CX3]=[OX1]"),
    ("fr_C_O_noCOO", "[C!$(C-[OH])]=O"),
    ("fr_C_S", "C=[SX1]"),
    ("fr_HOCCN", "[OX2H]-[CX4]-[CX4]-[NX3]"),
    ("fr_Imine", "[Nv3](=C)-[#6]"),
    ("fr_NH0", "[NH0,nH0]"),
    ("fr_NH1", "[NH1,nH1]"),
    ("fr_NH2", "[NH2,nH2]"),
    ("fr_N_O", "[NX3;!$(N=O)]-[OX2]"),
    ("fr_Ndealkylation1", "[CX4;!H0]-[NX3;H0,H1;!$(N[C,S]=[O,N,S]);!$(Na)]"),
    ("fr_Ndealkylation2", "[NX3;H0;R;!$(N[C,S]=[O,N,S]);!$(Na)]([CX4;R])([CX4;R])[CX4]"),
    ("fr_Nhpyrrole", "[nH1;X3]"),
    ("fr_SH", "[SH]"),
    ("fr_aldehyde", "[CX3H1](=O)[#6]"),
    ("fr_alkyl_carbamate", "C[NH1]C(=O)OC"),
    ("fr_alkyl_halide", "[CX4]-[Cl,Br,I,F]"),
    ("fr_allylic_oxid", "[CX4;!H0;!R]-[CX3]=[CX3]"),
    ("fr_amide", "C(=O)-N"),
    ("fr_amidine", "C(=N)(-N)-[!#7]"),
    ("fr_aniline", "c-[NX3]"),
    ("fr_aryl_methyl", "[$(a-[CH3]),$(a-[CH2]-[CH3]),$(a-[CH2]-[CH2]~[!N;!O])]"),
    ("fr_azide", "[$(*-[NX2-]-[NX2+]#[NX1]),$(*-[NX2]=[NX2+]=[NX1-])]"),
    ("fr_azo", "[#6]-N=N-[#6]"),
    ("fr_barbitur", "C1C(=O)NC(=O)NC1=O"),
    ("fr_benzene", "c1ccccc1"),
    ("fr_benzodiazepine", "c12ccccc1C(=N[#6][#6](=O)N2)"),
    ("fr_bicyclic", "[R2][R2]"),
    ("fr_diazo", "[N+]#N"),
    ("fr_dihydropyridine", "[$([NX3H1]1-C=C-C-C=C1),$([Nv3]1=C-C-C=C-C1),$([Nv3]1=C-C=C-C-C1)]"),
    ("fr_epoxide", "O1CC1"),
    ("fr_ester", "[#6][CX3](=O)[OX2H0][#6]"),
    ("fr_ether", "[OD2]([#6])[#6]"),
    ("fr_furan", "o1cccc1"),
    ("fr_guanido", "C(=N)(N)N"),
    ("fr_halogen", "[#9,#17,#35,#53]"),
    ("fr_hdrzine", "[NX3]-[NX3]"),
    ("fr_hdrzone", "C=N-[NX3]"),
    ("fr_imidazole", "c1cnc[nH]1"),
    ("fr_imide", "N(-C(=O))-C=O"),
    ("fr_isocyan", "N=C=O"),
    ("fr_isothiocyan", "N=C=S"),
    ("fr_ketone", "[#6][CX3](=O)[#6]"),
    ("fr_ketone_Topliss", "[#6][CX3;!$(C(c)c);!$(C-[#6]=[#6]);!$(C-[CX4]-[!#6;!#1])](=O)[#6]"),
    ("fr_lactam", "N1C(=O)CC1"),
    ("fr_lactone", "[C&R1](=O)[O&R1][C&R1]"),
    ("fr_methoxy", "[OX2](-[#6])-[CH3]"),
    ("fr_morpholine", "O1CCNCC1"),
    ("fr_nitrile", "[NX1]#[CX2]"),
    ("fr_nitro", "[$([NX3](=O)=O),$([NX3+](=O)[O-])][!#8]"),
    ("fr_nitro_arom", "[$(c1(-[$([NX3](=O)=O),$([NX3+](=O)[O-])])ccccc1)]"),
    ("fr_nitro_arom_nonortho", "[$(c1(-[$([NX3](=O)=O),$([NX3+](=O)[O-])])[cH]ccc[cH]1)]"),
    ("fr_nitroso", "[N&D2](=O)"),
    ("fr_oxazole", "c1ocnc1"),
    ("fr_oxime", "[CX3]=[NX2]-[OX2]"),
    ("fr_para_hydroxylation", "[$([cH]1[cH]cc(c[cH]1)~[$([#8,$([#8]~[H,c,C])])]),$([cH]1[cH]cc(c[cH]1)~[$([#7X3,$([#7](~[H,c,C])~[H,c,C])])]),$([cH]1[cH]cc(c[cH]1)-!:[$([NX3H,$(NC(=O)[H,c,C])])])]"),
    ("fr_phenol", "[OX2H]-c1ccccc1"),
    ("fr_phenol_noOrthoHbond", "[OX2H;!$(O-c:c-[#7,#8,#9,#17,#35,#53,$(C=O)])]-c1ccccc1"),
    ("fr_phos_acid", "[PX4;$(P(=O)([OX2H,OX1-])),$(P(=O)[OX2H,OX1-])]"),
    ("fr_phos_ester", "[PX4;$(P(=O)[OX2][#6])]"),
    ("fr_piperdine", "N1CCCCC1"),
    ("fr_piperzine", "N1CCNCC1"),
    ("fr_priamide", "C(=O)-[NH2]"),
    ("fr_prisulfonamd", "[NH2]-S(=,:O)(=,:O)-,:[#6]"),
    ("fr_pyridine", "n1ccccc1"),
    ("fr_quatN", "[$([NX4+]),$([NX4]=*)]"),
    ("fr_sulfide", "[SX2](-[#6])-C"),
    ("fr_sulfonamd", "N-S(=,:O)(=,:O)-,:[#6]"),
    ("fr_sulfone", "S(=,:[O,N])(=,:[O,N])"),
    ("fr_term_acetylene", "C#[CH]"),
    ("fr_tetrazole", "c1nnnn1"),
    ("fr_thiazole", "c1scnc1"),
    ("fr_thiocyan", "S-C#N"),
    ("fr_thiophene", "s1cccc1"),
    ("fr_unbrch_alkane", "[R0;D2][R0;D2][R0;D2][R0;D2]"),
    ("fr_urea", "C(=O)(-N)-N"),
]);

/// Functional group counts in `FRAGMENTS` order
pub fn fragment_counts(target: &MatchTarget) -> Vec<usize> {
    FRAGMENTS.counts(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use molecule::parse_smiles;

    fn count(smiles: &str, name: &str) -> usize {
        let mol = parse_smiles(smiles).unwrap();
        let position = FRAGMENTS.names().position(|n| n == name).unwrap();
        fragment_counts(&MatchTarget::new(&mol))[position]
    }

    #[test]
    fn test_every_fragment_compiles() {
        assert_eq!(FRAGMENTS.len(), 85);
        assert!(FRAGMENTS.failures().is_empty(), "{:?}", FRAGMENTS.failures());
    }

    #[test]
    fn test_fragment_names_are_sorted() {
        let names: Vec<&str> = FRAGMENTS.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_aspirin_groups() {
        let aspirin = "CC(=O)Oc1ccccc1C(=O)O";
        assert_eq!(count(aspirin, "fr_ester"), 1);
        assert_eq!(count(aspirin, "fr_COO"), 1);
        assert_eq!(count(aspirin, "fr_Ar_COO"), 1);
        assert_eq!(count(aspirin, "fr_Al_COO"), 0);
        assert_eq!(count(aspirin, "fr_C_O"), 2);
        assert_eq!(count(aspirin, "fr_C_O_noCOO"), 1);
        assert_eq!(count(aspirin, "fr_benzene"), 1);
        assert_eq!(count(aspirin, "fr_ether"), 1);
        assert_eq!(count(aspirin, "fr_phenol"), 0);
    }

    #[test]
    fn test_hydroxyl_groups() {
        assert_eq!(count("Oc1ccccc1", "fr_phenol"), 1);
        assert_eq!(count("Oc1ccccc1", "fr_Ar_OH"), 1);
        assert_eq!(count("Oc1ccccc1", "fr_Al_OH"), 0);
        assert_eq!(count("CCO", "fr_Al_OH"), 1);
        assert_eq!(count("CC(C)(C)O", "fr_Al_OH"), 1);
        assert_eq!(count("CC(C)(C)O", "fr_Al_OH_noTert"), 0);
        // Ortho carbonyl takes the hydroxyl out of the plain phenol count
        assert_eq!(count("Oc1ccccc1C=O", "fr_phenol_noOrthoHbond"), 0);
    }

    #[test]
    fn test_nitrogen_groups() {
        assert_eq!(count("CC(N)=O", "fr_amide"), 1);
        assert_eq!(count("CC(N)=O", "fr_priamide"), 1);
        assert_eq!(count("NC(N)=O", "fr_urea"), 1);
        assert_eq!(count("CC#N", "fr_nitrile"), 1);
        assert_eq!(count("c1ccncc1", "fr_pyridine"), 1);
        assert_eq!(count("c1ccncc1", "fr_Ar_N"), 1);
        assert_eq!(count("Nc1ccccc1", "fr_aniline"), 1);
        assert_eq!(count("C[N+](=O)[O-]", "fr_nitro"), 1);
        assert_eq!(count("c1ccc(cc1)[N+](=O)[O-]", "fr_nitro_arom"), 1);
        assert_eq!(count("C1CCNCC1", "fr_piperdine"), 1);
    }

    #[test]
    fn test_chains_and_halogens() {
        assert_eq!(count("CCCCCC", "fr_unbrch_alkane"), 1);
        assert_eq!(count("CCCC", "fr_unbrch_alkane"), 0);
        assert_eq!(count("ClCCBr", "fr_halogen"), 2);
        assert_eq!(count("ClCCBr", "fr_alkyl_halide"), 2);
    }
}
