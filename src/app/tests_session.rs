//! Tests de campagne : session complète, sans réseau.
//!
//! Les réponses du solveur sont fabriquées à la main puis injectées via `recevoir`.

use serde_json::json;

use super::etat::{AppCalc, ErreurSaisie};
use crate::config::Config;
use crate::noyau::graphe::NB_POINTS;
use crate::noyau::Mode;
use crate::service::{ErreurService, ReponseSolve, TypeProbleme, MESSAGE_GENERIQUE};

fn succes(result: serde_json::Value) -> Result<ReponseSolve, ErreurService> {
    Ok(ReponseSolve {
        success: true,
        result,
        steps: vec!["étape 1".into()],
    })
}

fn echec_detail(detail: &str) -> Result<ReponseSolve, ErreurService> {
    Err(ErreurService::Reponse {
        statut: 400,
        detail: Some(detail.into()),
    })
}

fn taper(app: &mut AppCalc, libelles: &[&str]) {
    for l in libelles {
        assert!(app.appuyer(l).is_none(), "touche {l:?} ne doit rien envoyer");
    }
}

/* ------------------------ Soumission ------------------------ */

#[test]
fn soumission_vide_sans_requete() {
    let mut app = AppCalc::default();
    assert_eq!(app.preparer_soumission(), Err(ErreurSaisie::EntreeVide));

    assert!(app.soumettre().is_none());
    assert_eq!(app.erreur, ErreurSaisie::EntreeVide.to_string());
    assert!(!app.occupe);
}

#[test]
fn soumission_seulement_marqueur() {
    let mut app = AppCalc::default();
    taper(&mut app, &["xʸ"]);
    assert!(app.soumettre().is_none());
    assert!(!app.erreur.is_empty());
}

#[test]
fn soumission_forme_la_requete() {
    let mut app = AppCalc::default();
    taper(&mut app, &["x", "xʸ", "2", "-", "4"]);
    app.set_type(TypeProbleme::Calcul);

    let envoi = app.soumettre().unwrap_or_else(|| panic!("{}", app.erreur));
    assert_eq!(envoi.requete.equation, "x**2-4");
    assert_eq!(envoi.requete.variable, "x");
    assert_eq!(envoi.requete.type_probleme, TypeProbleme::Calcul);
    assert!(app.occupe);
    // le tampon n’est jamais réécrit par la soumission
    assert_eq!(app.tampon(), "x²-4");
}

#[test]
fn touche_egal_soumet() {
    let mut app = AppCalc::default();
    app.changer_mode(Mode::Arithmetique);
    taper(&mut app, &["5", "x!"]);

    let envoi = app.appuyer("=");
    let envoi = envoi.unwrap_or_else(|| panic!("pas d’envoi"));
    assert_eq!(envoi.requete.equation, "factorial(5)");
    assert_eq!(envoi.requete.type_probleme, TypeProbleme::Arithmetique);
}

#[test]
fn demarche_de_la_derniere_soumission() {
    let mut app = AppCalc::default();
    taper(&mut app, &["2", "π"]);
    assert!(app.soumettre().is_some());
    assert_eq!(
        app.demarche.last().map(|(_, t)| t.as_str()),
        Some("2*pi")
    );
}

/* ------------------------ Réponses ------------------------ */

#[test]
fn reponse_perimee_ignoree() {
    let mut app = AppCalc::default();
    taper(&mut app, &["1", "+", "1"]);
    let premier = app.soumettre().map(|e| e.jeton);
    let second = app.soumettre().map(|e| e.jeton);
    let (Some(premier), Some(second)) = (premier, second) else {
        panic!("deux envois attendus");
    };
    assert_ne!(premier, second);

    app.recevoir(premier, succes(json!("ancien")));
    assert!(app.reponse.is_none());
    assert!(app.occupe);

    app.recevoir(second, succes(json!("2")));
    assert_eq!(app.reponse.as_ref().map(|r| r.apercu()), Some("2".into()));
    assert!(!app.occupe);
}

#[test]
fn effacer_invalide_la_requete() {
    let mut app = AppCalc::default();
    taper(&mut app, &["7"]);
    let jeton = app.soumettre().map(|e| e.jeton).unwrap_or_default();

    app.effacer();
    assert_eq!(app.tampon(), "");
    assert!(!app.occupe);

    app.recevoir(jeton, succes(json!("7")));
    assert!(app.reponse.is_none());
    assert!(app.historique.is_empty());
}

#[test]
fn echec_message_du_serveur() {
    let mut app = AppCalc::default();
    taper(&mut app, &["x", "+"]);
    let jeton = app.soumettre().map(|e| e.jeton).unwrap_or_default();

    app.recevoir(jeton, echec_detail("Invalid equation format"));
    assert_eq!(app.erreur, "Invalid equation format");
    assert!(!app.occupe);
    assert_eq!(app.tampon(), "x+");

    let jeton = app.soumettre().map(|e| e.jeton).unwrap_or_default();
    app.recevoir(jeton, Err(ErreurService::Transport("refusé".into())));
    assert_eq!(app.erreur, MESSAGE_GENERIQUE);
}

#[test]
fn historique_borne_plus_recent_en_tete() {
    let mut app = AppCalc::new(Config::default());
    for k in 0..8 {
        app.effacer();
        taper(&mut app, &[&k.to_string()]);
        let jeton = app.soumettre().map(|e| e.jeton).unwrap_or_default();
        app.recevoir(jeton, succes(json!([k, k + 1, k + 2, k + 3])));
    }

    assert_eq!(app.historique.len(), 6);
    assert_eq!(app.historique[0].equation, "7");
    assert_eq!(app.historique[0].apercu, "7, 8, 9");
    assert_eq!(app.historique[5].equation, "2");
    assert!(app.historique[0].id > app.historique[1].id);
}

#[test]
fn memoire_depuis_le_resultat() {
    let mut app = AppCalc::default();
    taper(&mut app, &["2", "+", "2"]);
    let jeton = app.soumettre().map(|e| e.jeton).unwrap_or_default();
    app.recevoir(jeton, succes(json!("4")));

    taper(&mut app, &["M+", "C"]);
    assert_eq!(app.tampon(), "");
    assert!(app.reponse.is_none());

    // sans résultat, M+ prend le tampon
    taper(&mut app, &["MR", "+", "1"]);
    assert_eq!(app.tampon(), "4+1");
    taper(&mut app, &["M+"]);
    assert_eq!(app.clavier.memoire(), Some("4+1"));
}

/* ------------------------ Norme ------------------------ */

#[test]
fn norme_validations() {
    let mut app = AppCalc::default();
    assert_eq!(app.preparer_norme(), Err(ErreurSaisie::NormeVide));

    taper(&mut app, &["3", "+", "4"]);
    assert_eq!(app.preparer_norme(), Err(ErreurSaisie::NormeSansVecteur));
    assert_eq!(app.tampon(), "3+4");
}

#[test]
fn norme_enveloppe_puis_restaure_si_echec() {
    let mut app = AppCalc::default();
    app.clavier.remplacer_tampon(" [3,4] ");

    let envoi = app.trouver_norme().unwrap_or_else(|| panic!("{}", app.erreur));
    assert_eq!(app.tampon(), "||[3,4]||");
    assert_eq!(envoi.requete.equation, "||[3,4]||");

    app.recevoir(envoi.jeton, echec_detail("Vecteur invalide"));
    assert_eq!(app.tampon(), " [3,4] ");
    assert_eq!(app.erreur, "Vecteur invalide");
}

#[test]
fn norme_deja_enveloppee_et_succes() {
    let mut app = AppCalc::default();
    app.clavier.remplacer_tampon("||{4,3,0}||");

    let envoi = app.trouver_norme().unwrap_or_else(|| panic!("{}", app.erreur));
    assert_eq!(app.tampon(), "||{4,3,0}||");

    app.recevoir(envoi.jeton, succes(json!("5")));
    assert_eq!(app.tampon(), "||{4,3,0}||");
    assert_eq!(app.historique[0].equation, "||{4,3,0}||");
}

#[test]
fn norme_sur_selection() {
    let mut app = AppCalc::default();
    app.clavier.remplacer_tampon("2*[3,4]");
    let curseur = app.envelopper_norme(2, 7);
    assert_eq!(app.tampon(), "2*||[3,4]||");
    assert_eq!(curseur, 9);
}

/* ------------------------ Graphe ------------------------ */

#[test]
fn graphe_apres_resolution_algebrique() {
    let mut app = AppCalc::default();
    app.clavier.remplacer_tampon("x²-4=0");
    let jeton = app.soumettre().map(|e| e.jeton).unwrap_or_default();
    assert!(app.graphe.is_none());

    app.recevoir(jeton, succes(json!(["-2", "2"])));
    let serie = app.graphe.clone().unwrap_or_else(|| panic!("graphe attendu"));
    assert_eq!(serie.points.len(), NB_POINTS);
    assert_eq!(serie.points[20], (0.0, Some(-4.0)));

    // changement de type => plus de graphe
    app.set_type(TypeProbleme::Trigo);
    assert!(app.graphe.is_none());
}

#[test]
fn pas_de_graphe_en_arithmetique() {
    let mut app = AppCalc::default();
    app.changer_mode(Mode::Arithmetique);
    taper(&mut app, &["2", "+", "3"]);
    let jeton = app.soumettre().map(|e| e.jeton).unwrap_or_default();
    app.recevoir(jeton, succes(json!("5")));
    assert!(app.reponse.is_some());
    assert!(app.graphe.is_none());
}

#[test]
fn graphe_suit_la_variable() {
    let mut app = AppCalc::default();
    app.set_variable("t");
    taper(&mut app, &["t", "+", "1"]);
    let envoi = app.soumettre().unwrap_or_else(|| panic!("{}", app.erreur));
    assert_eq!(envoi.requete.variable, "t");
    app.recevoir(envoi.jeton, succes(json!("-1")));
    assert!(app.graphe.is_some());

    // variable vide => x ; "t" n’est plus lié, aucun point défini
    app.set_variable("  ");
    assert_eq!(app.variable, "x");
    assert!(app.graphe.is_none());
}

/* ------------------------ Sélecteurs ------------------------ */

#[test]
fn mode_arithmetique_reinitialise() {
    let mut app = AppCalc::default();
    app.set_type(TypeProbleme::Trigo);
    app.set_variable("y");
    app.set_erreur("vieille erreur");

    app.changer_mode(Mode::Arithmetique);
    assert_eq!(app.type_probleme, TypeProbleme::Algebre);
    assert_eq!(app.variable, "x");
    assert!(app.erreur.is_empty());
    assert_eq!(app.type_actif(), TypeProbleme::Arithmetique);
}

#[test]
fn edition_libre_resynchronise() {
    let mut app = AppCalc::default();
    taper(&mut app, &["2", "xʸ"]);
    assert!(app.clavier.attente_exposant());

    app.clavier.tampon_mut().pop();
    app.tampon_edite();
    assert!(!app.clavier.attente_exposant());
}

#[test]
fn historique_garde_le_type_de_la_soumission() {
    let mut app = AppCalc::default();
    app.set_type(TypeProbleme::Calcul);
    taper(&mut app, &["x", "xʸ", "3"]);
    let jeton = app.soumettre().map(|e| e.jeton).unwrap_or_default();

    // changement pendant l’attente : sans effet sur l’entrée d’historique
    app.changer_mode(Mode::Arithmetique);
    app.recevoir(jeton, succes(json!("3*x**2")));

    assert_eq!(app.historique[0].type_probleme, TypeProbleme::Calcul);
}

#[test]
fn rappel_depuis_l_historique() {
    let mut app = AppCalc::default();
    taper(&mut app, &["x", "xʸ", "2", "-", "1"]);
    let jeton = app.soumettre().map(|e| e.jeton).unwrap_or_default();
    app.recevoir(jeton, succes(json!(["-1", "1"])));

    app.effacer();
    taper(&mut app, &["2", "xʸ"]);
    assert!(app.clavier.attente_exposant());

    let eq = app.historique[0].equation.clone();
    app.rappeler(&eq);
    assert_eq!(app.tampon(), "x²-1");
    assert!(!app.clavier.attente_exposant());
}

#[test]
fn memoire_depuis_un_resultat_liste() {
    let mut app = AppCalc::default();
    taper(&mut app, &["x", "xʸ", "2", "-", "4"]);
    let jeton = app.soumettre().map(|e| e.jeton).unwrap_or_default();
    app.recevoir(jeton, succes(json!(["-2", "2"])));

    taper(&mut app, &["M+", "C", "MR"]);
    assert_eq!(app.tampon(), "-2,2");
}
