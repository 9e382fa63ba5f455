//! src/app/etat.rs
//!
//! État de session (sans vue, sans réseau).
//!
//! Rôle : seul écrivain du tampon, de la mémoire, du mode, du résultat, de l’historique
//! et du graphe. Chaque action est une transition déterministe ; l’envoi réseau est
//! délégué à l’appelant via `Envoi`, la réponse revient par `recevoir`.
//!
//! Contrats :
//! - Une soumission vide n’émet jamais de requête.
//! - Chaque requête porte un jeton ; une réponse dont le jeton n’est plus le dernier
//!   émis est ignorée (réseau dans le désordre, C pendant l’attente).
//! - Si « Norme » a ajouté les barres et que le solveur échoue, le tampon d’avant revient.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::noyau::clavier::BARRES_NORME;
use crate::noyau::normalisation::normaliser_detaille;
use crate::noyau::{
    graphe_du_tampon, normaliser, Clavier, Effet, EvaluateurFlottant, Mode, SerieGraphe, Touche,
};
use crate::service::{ErreurService, ReponseSolve, RequeteSolve, TypeProbleme};

/// Erreurs de saisie : détectées avant tout appel réseau. Le texte est affiché tel quel.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurSaisie {
    #[error("Entrez une équation à résoudre.")]
    EntreeVide,
    #[error("Entrez un vecteur pour calculer sa norme (ex: [3,4] ou {{4,3,0}}).")]
    NormeVide,
    #[error("Entrez un vecteur au format [a,b], {{a,b}} ou [a,b]+[c,d].")]
    NormeSansVecteur,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntreeHistorique {
    pub id: u64,
    pub equation: String,
    pub type_probleme: TypeProbleme,
    pub apercu: String,
    pub horodatage: String,
}

/// Requête prête à partir, avec son jeton.
#[derive(Clone, Debug, PartialEq)]
pub struct Envoi {
    pub jeton: u64,
    pub requete: RequeteSolve,
}

#[derive(Clone, Debug)]
struct RequeteEnCours {
    jeton: u64,
    /// Texte montré dans l’historique (tampon d’origine, ou enveloppé pour la norme).
    equation_affichee: String,
    /// Tampon d’avant l’ajout automatique des barres (à restaurer si échec).
    tampon_avant_norme: Option<String>,
    /// Type actif au moment de l’envoi.
    type_probleme: TypeProbleme,
}

static VECTEUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]|\{[^}]+\}").expect("motif vecteur invalide"));

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub clavier: Clavier,
    pub mode: Mode,
    pub type_probleme: TypeProbleme,
    pub variable: String,

    // --- sorties ---
    pub reponse: Option<ReponseSolve>,
    pub erreur: String,
    pub occupe: bool,
    pub historique: Vec<EntreeHistorique>,
    pub graphe: Option<SerieGraphe>,

    // --- démarche (étapes de normalisation de la dernière soumission) ---
    pub demarche: Vec<(&'static str, String)>,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,

    config: Config,
    dernier_jeton: u64,
    en_cours: Option<RequeteEnCours>,
    prochain_id: u64,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppCalc {
    pub fn new(config: Config) -> Self {
        Self {
            clavier: Clavier::default(),
            mode: Mode::default(),
            type_probleme: TypeProbleme::Algebre,
            variable: config.variable_defaut.clone(),
            reponse: None,
            erreur: String::new(),
            occupe: false,
            historique: Vec::new(),
            graphe: None,
            demarche: Vec::new(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
            config,
            dernier_jeton: 0,
            en_cours: None,
            prochain_id: 1,
        }
    }

    pub fn tampon(&self) -> &str {
        self.clavier.tampon()
    }

    /// Type envoyé au solveur : arithmétique en mode arithmétique.
    pub fn type_actif(&self) -> TypeProbleme {
        match self.mode {
            Mode::Arithmetique => TypeProbleme::Arithmetique,
            Mode::Symbolique => self.type_probleme,
        }
    }

    /* ------------------------ Sélecteurs ------------------------ */

    pub fn changer_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.erreur.clear();
        self.reponse = None;
        if mode == Mode::Arithmetique {
            self.type_probleme = TypeProbleme::Algebre;
            self.variable = self.config.variable_defaut.clone();
        }
        self.rafraichir_graphe();
    }

    pub fn set_type(&mut self, type_probleme: TypeProbleme) {
        self.type_probleme = type_probleme;
        self.rafraichir_graphe();
    }

    /// Variable vide => variable par défaut.
    pub fn set_variable(&mut self, variable: &str) {
        let v = variable.trim();
        self.variable = if v.is_empty() {
            self.config.variable_defaut.clone()
        } else {
            v.to_string()
        };
        self.rafraichir_graphe();
    }

    /* ------------------------ Pavé ------------------------ */

    /// Bouton du pavé (ou raccourci clavier). Peut produire un envoi (touche =).
    pub fn appuyer(&mut self, libelle: &str) -> Option<Envoi> {
        self.touche(Touche::depuis_libelle(libelle))
    }

    pub fn touche(&mut self, touche: Touche) -> Option<Envoi> {
        let resultat = self.reponse.as_ref().and_then(ReponseSolve::texte_resultat);
        let effet = self.clavier.appliquer(&touche, resultat.as_deref());
        self.focus_entree = true;

        match effet {
            Effet::Tampon => {
                self.rafraichir_graphe();
                None
            }
            Effet::Effacement => {
                self.effacer_sorties();
                None
            }
            Effet::Soumission => self.soumettre(),
        }
    }

    /// À appeler après une édition libre du champ texte.
    pub fn tampon_edite(&mut self) {
        self.clavier.resynchroniser();
        self.rafraichir_graphe();
    }

    /// Entrée d’historique cliquée : l’équation revient dans le tampon.
    pub fn rappeler(&mut self, equation: &str) {
        self.clavier.remplacer_tampon(equation);
        self.rafraichir_graphe();
        self.focus_entree = true;
    }

    /// C / Échap : tampon, résultat, erreur ; la requête en vol devient périmée.
    pub fn effacer(&mut self) {
        self.clavier.appliquer(&Touche::Effacer, None);
        self.effacer_sorties();
    }

    fn effacer_sorties(&mut self) {
        self.reponse = None;
        self.erreur.clear();
        self.graphe = None;
        self.demarche.clear();
        self.invalider_requete();
        self.focus_entree = true;
    }

    fn invalider_requete(&mut self) {
        if self.en_cours.take().is_some() {
            debug!(jeton = self.dernier_jeton, "requête en vol abandonnée");
        }
        self.dernier_jeton += 1;
        self.occupe = false;
    }

    /// Barres de norme autour de la sélection ; renvoie la position du curseur.
    pub fn envelopper_norme(&mut self, debut: usize, fin: usize) -> usize {
        let curseur = self.clavier.envelopper_norme(debut, fin);
        self.rafraichir_graphe();
        self.focus_entree = true;
        curseur
    }

    /* ------------------------ Soumissions ------------------------ */

    /// Valide + normalise + émet. Sans effet sur la session si la saisie est refusée.
    pub fn preparer_soumission(&mut self) -> Result<Envoi, ErreurSaisie> {
        let tampon = self.tampon().to_string();
        if tampon.trim().is_empty() {
            return Err(ErreurSaisie::EntreeVide);
        }
        let canon = normaliser(&tampon, self.mode);
        if canon.trim().is_empty() {
            return Err(ErreurSaisie::EntreeVide);
        }
        Ok(self.emettre(canon, tampon, None))
    }

    /// Soumission (bouton « Résoudre », touche =, Entrée).
    pub fn soumettre(&mut self) -> Option<Envoi> {
        self.erreur.clear();
        self.reponse = None;
        match self.preparer_soumission() {
            Ok(envoi) => Some(envoi),
            Err(e) => {
                self.set_erreur(e.to_string());
                None
            }
        }
    }

    /// « Norme » : exige une notation vecteur, ajoute ||…|| si absent, puis émet.
    pub fn preparer_norme(&mut self) -> Result<Envoi, ErreurSaisie> {
        let tampon = self.tampon().to_string();
        let expr = tampon.trim();
        if expr.is_empty() {
            return Err(ErreurSaisie::NormeVide);
        }
        if !VECTEUR.is_match(expr) {
            return Err(ErreurSaisie::NormeSansVecteur);
        }

        let deja = expr.len() >= 2 * BARRES_NORME.len()
            && expr.starts_with(BARRES_NORME)
            && expr.ends_with(BARRES_NORME);

        let (equation, avant) = if deja {
            (expr.to_string(), None)
        } else {
            let enveloppe = format!("{BARRES_NORME}{expr}{BARRES_NORME}");
            self.clavier.remplacer_tampon(enveloppe.clone());
            (enveloppe, Some(tampon))
        };

        let canon = normaliser(&equation, self.mode);
        Ok(self.emettre(canon, equation, avant))
    }

    pub fn trouver_norme(&mut self) -> Option<Envoi> {
        self.erreur.clear();
        self.reponse = None;
        match self.preparer_norme() {
            Ok(envoi) => Some(envoi),
            Err(e) => {
                self.set_erreur(e.to_string());
                None
            }
        }
    }

    fn emettre(
        &mut self,
        canon: String,
        equation_affichee: String,
        tampon_avant_norme: Option<String>,
    ) -> Envoi {
        self.demarche = normaliser_detaille(&equation_affichee, self.mode);
        self.erreur.clear();
        self.reponse = None;
        self.graphe = None;

        self.dernier_jeton += 1;
        let jeton = self.dernier_jeton;
        self.en_cours = Some(RequeteEnCours {
            jeton,
            equation_affichee,
            tampon_avant_norme,
            type_probleme: self.type_actif(),
        });
        self.occupe = true;

        let requete = RequeteSolve {
            equation: canon,
            variable: self.variable.clone(),
            type_probleme: self.type_actif(),
        };
        info!(jeton, equation = %requete.equation, type_probleme = ?requete.type_probleme, "soumission");

        Envoi { jeton, requete }
    }

    /* ------------------------ Réponses ------------------------ */

    /// Applique une réponse si son jeton est le dernier émis ; sinon l’ignore.
    pub fn recevoir(&mut self, jeton: u64, resultat: Result<ReponseSolve, ErreurService>) {
        let courant = matches!(&self.en_cours, Some(c) if c.jeton == jeton)
            && jeton == self.dernier_jeton;
        if !courant {
            debug!(jeton, dernier = self.dernier_jeton, "réponse périmée ignorée");
            return;
        }
        let Some(en_cours) = self.en_cours.take() else {
            return;
        };
        self.occupe = false;

        match resultat {
            Ok(reponse) => {
                self.ajouter_historique(en_cours.equation_affichee, en_cours.type_probleme, &reponse);
                self.reponse = Some(reponse);
                self.erreur.clear();
                self.rafraichir_graphe();
            }
            Err(e) => {
                warn!(jeton, erreur = %e, "échec du solveur");
                self.set_erreur(e.message_utilisateur());
                if let Some(avant) = en_cours.tampon_avant_norme {
                    self.clavier.remplacer_tampon(avant);
                }
            }
        }
    }

    fn ajouter_historique(
        &mut self,
        equation: String,
        type_probleme: TypeProbleme,
        reponse: &ReponseSolve,
    ) {
        let entree = EntreeHistorique {
            id: self.prochain_id,
            equation,
            type_probleme,
            apercu: reponse.apercu(),
            horodatage: chrono::Local::now().format("%H:%M:%S").to_string(),
        };
        self.prochain_id += 1;

        // plus récent en tête, longueur bornée
        self.historique.insert(0, entree);
        self.historique.truncate(self.config.taille_historique);
    }

    /* ------------------------ Graphe ------------------------ */

    /// Recalcul complet (jamais incrémental) : algèbre symbolique résolue seulement.
    pub fn rafraichir_graphe(&mut self) {
        let eligible = self.mode == Mode::Symbolique
            && self.type_probleme == TypeProbleme::Algebre
            && self.reponse.as_ref().is_some_and(|r| r.success);

        self.graphe = if eligible {
            let g = graphe_du_tampon(self.tampon(), &self.variable, &EvaluateurFlottant);
            if g.is_none() {
                debug!(tampon = %self.tampon(), "aucun point défini, pas de graphe");
            }
            g
        } else {
            None
        };
    }

    /* ------------------------ Utilitaires ------------------------ */

    /// Utilitaire : placer une erreur (la session reste utilisable).
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.graphe = None;
        self.focus_entree = true;
    }
}
