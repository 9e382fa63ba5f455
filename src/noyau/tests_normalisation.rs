//! Tests de campagne : pavé -> tampon -> forme canonique.
//!
//! But : vérifier le pipeline de bout en bout, comme l’utilisateur le déclenche.
//! - séquences de touches réalistes (mode arithmétique et symbolique)
//! - propriétés sur toute la table des chiffres
//! - ordre des étapes (exposants AVANT puissance, espaces AVANT combinatoire)

use super::clavier::{Clavier, Touche};
use super::exposants::{depuis_exposant, vers_exposant};
use super::normalisation::{normaliser, Mode};

fn taper(libelles: &[&str]) -> Clavier {
    let mut c = Clavier::default();
    for l in libelles {
        c.appliquer(&Touche::depuis_libelle(l), None);
    }
    c
}

fn assert_canon(libelles: &[&str], mode: Mode, attendu: &str) {
    let c = taper(libelles);
    let canon = normaliser(c.tampon(), mode);
    assert_eq!(canon, attendu, "touches={libelles:?} tampon={:?}", c.tampon());
}

/* ------------------------ Propriétés sur les chiffres ------------------------ */

#[test]
fn prop_aller_retour_exposants() {
    for d in '0'..='9' {
        assert_eq!(depuis_exposant(vers_exposant(d)), Some(d));
    }
}

#[test]
fn prop_pi_adjacent_aux_chiffres() {
    for d in '0'..='9' {
        assert_eq!(normaliser(&format!("{d}pi"), Mode::Symbolique), format!("{d}*pi"));
        assert_eq!(normaliser(&format!("pi{d}"), Mode::Symbolique), format!("pi*{d}"));
        assert_eq!(normaliser(&format!("{d}π"), Mode::Arithmetique), format!("{d}*pi"));
    }
}

#[test]
fn prop_puissance_toute_la_table() {
    for d in '0'..='9' {
        let c = taper(&["x", "xʸ", &d.to_string()]);
        assert_eq!(c.tampon(), format!("x{}", vers_exposant(d)));
        assert!(!c.attente_exposant());
        assert_eq!(normaliser(c.tampon(), Mode::Symbolique), format!("x**{d}"));
    }
}

/* ------------------------ Exemples de référence ------------------------ */

#[test]
fn ref_postfixes_et_combinatoire() {
    assert_eq!(normaliser("5!", Mode::Arithmetique), "factorial(5)");
    assert_eq!(normaliser("7%", Mode::Arithmetique), "(7/100)");
    assert_eq!(normaliser("7%3", Mode::Arithmetique), "(7/100)*3");
    assert_eq!(normaliser("4P2", Mode::Arithmetique), "nPr(4,2)");
    assert_eq!(normaliser("4C2", Mode::Arithmetique), "nCr(4,2)");
}

/* ------------------------ Séquences de touches ------------------------ */

#[test]
fn pave_arithmetique() {
    assert_canon(&["1", "2", "×", "3", "+", "4", "x!"], Mode::Arithmetique, "12*3+factorial(4)");
    assert_canon(&["2", "π", "×", "5", "xʸ", "2"], Mode::Arithmetique, "2*pi*5**2");
    assert_canon(&["2", "0", "0", "×", "1", "5", "%"], Mode::Arithmetique, "200*(15/100)");
    assert_canon(&["5", "nCr", "2", "-", "3", "nPr", "1"], Mode::Arithmetique, "nCr(5,2)-nPr(3,1)");
}

#[test]
fn pave_fonctions() {
    assert_canon(&["asin", "1", ")", "+", "log", "1", "0", ")"], Mode::Arithmetique, "asin(1)+log(10)");
    assert_canon(&["√", "2", ")", "×", "e"], Mode::Arithmetique, "sqrt(2)*e");
}

#[test]
fn pave_symbolique_garde_la_variable() {
    assert_canon(&["3", "×", "x", "xʸ", "2", "-", "4"], Mode::Symbolique, "3*x**2-4");
    assert_canon(&["3", "×", "x"], Mode::Arithmetique, "3**");
}

#[test]
fn marqueur_abandonne_a_la_soumission() {
    assert_canon(&["9", "xʸ"], Mode::Arithmetique, "9");
}

#[test]
fn signe_puis_normalisation() {
    assert_canon(&["8", "-", "3", "±"], Mode::Arithmetique, "8--3");
}

/* ------------------------ Ordre des étapes ------------------------ */

#[test]
fn ordre_exposant_avant_puissance() {
    // "x²" doit devenir une puissance, pas "x2"
    assert_eq!(normaliser("x² + x^3", Mode::Symbolique), "x**2+x**3");
}

#[test]
fn ordre_espaces_avant_combinatoire() {
    assert_eq!(normaliser("6 P 2", Mode::Symbolique), "nPr(6,2)");
}

#[test]
fn ordre_pourcent_avant_espaces() {
    // les espaces ne sont retirés qu’après : "7 %" n’est pas un pourcentage
    assert_eq!(normaliser("7 %", Mode::Symbolique), "7%");
}

#[test]
fn norme_passe_telle_quelle() {
    assert_eq!(normaliser("||[3,4]||", Mode::Arithmetique), "||[3,4]||");
}

#[test]
fn totalite_sur_entree_vide() {
    assert_eq!(normaliser("", Mode::Symbolique), "");
    assert_eq!(normaliser("   ", Mode::Symbolique), "");
}
