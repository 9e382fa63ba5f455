// src/noyau/clavier.rs
//
// Pavé virtuel -> tampon
// ----------------------
// Le `Clavier` possède le tampon, la mémoire (M+/MR/MC) et un drapeau explicite
// « exposant attendu ». Chaque touche est une réécriture du tampon ; aucune ne peut échouer.
//
// Priorité (la première règle qui s’applique gagne) :
//   1. contrôle (C, ⌫, =)       8. xʸ : pose le marqueur □
//   2. mémoire (M+, MR, MC)     9. chiffre après □ : exposant à la place du chiffre
//   3. ×                       10. nPr / nCr : lettre P / C
//   4. trig inverse : "sin⁻¹(" 11. ± : inversion de signe
//   5. sin, cos, ... : "sin("  12. %, x! : glyphe brut
//   6. √ : "sqrt("             13. le reste : texte brut
//   7. π, e : glyphe brut

use super::exposants::{vers_exposant, LIBELLES_TRIG_INVERSE};
use super::signe::inverser_signe;

/// Marqueur « exposant en attente », posé par xʸ.
pub const MARQUEUR_EXPOSANT: char = '□';

/// Produit explicite (distinct de la lettre x).
pub const SYMBOLE_PRODUIT: char = '×';

/// Barres de norme vectorielle.
pub const BARRES_NORME: &str = "||";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigInverse {
    Asin,
    Acos,
    Atan,
}

impl TrigInverse {
    pub fn nom(self) -> &'static str {
        match self {
            TrigInverse::Asin => "asin",
            TrigInverse::Acos => "acos",
            TrigInverse::Atan => "atan",
        }
    }

    /// Libellé affiché ("sin⁻¹", ...).
    pub fn libelle(self) -> &'static str {
        LIBELLES_TRIG_INVERSE
            .iter()
            .find(|(_, nom)| *nom == self.nom())
            .map(|(libelle, _)| *libelle)
            .unwrap_or_else(|| self.nom())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
}

impl Fonction {
    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Log => "log",
            Fonction::Ln => "ln",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constante {
    Pi,
    E,
}

/// Une touche du pavé.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Touche {
    Effacer,
    Retour,
    Soumettre,

    MemoireStocker,
    MemoireRappel,
    MemoireEffacer,

    Produit,
    TrigInverse(TrigInverse),
    Fonction(Fonction),
    Racine,
    Constante(Constante),
    Puissance,
    Chiffre(char),
    Permutation,
    Combinaison,
    Signe,
    Pourcent,
    Factorielle,

    Texte(String),
}

impl Touche {
    /// Libellé de bouton (ou touche clavier) -> Touche. Inconnu => `Texte`.
    pub fn depuis_libelle(libelle: &str) -> Touche {
        match libelle {
            "C" => Touche::Effacer,
            "⌫" => Touche::Retour,
            "=" => Touche::Soumettre,
            "M+" => Touche::MemoireStocker,
            "MR" => Touche::MemoireRappel,
            "MC" => Touche::MemoireEffacer,
            "×" | "*" => Touche::Produit,
            "asin" | "sin⁻¹" => Touche::TrigInverse(TrigInverse::Asin),
            "acos" | "cos⁻¹" => Touche::TrigInverse(TrigInverse::Acos),
            "atan" | "tan⁻¹" => Touche::TrigInverse(TrigInverse::Atan),
            "sin" => Touche::Fonction(Fonction::Sin),
            "cos" => Touche::Fonction(Fonction::Cos),
            "tan" => Touche::Fonction(Fonction::Tan),
            "log" => Touche::Fonction(Fonction::Log),
            "ln" => Touche::Fonction(Fonction::Ln),
            "√" => Touche::Racine,
            "π" => Touche::Constante(Constante::Pi),
            "e" => Touche::Constante(Constante::E),
            "xʸ" => Touche::Puissance,
            "nPr" => Touche::Permutation,
            "nCr" => Touche::Combinaison,
            "±" => Touche::Signe,
            "%" => Touche::Pourcent,
            "x!" => Touche::Factorielle,
            s => {
                let mut it = s.chars();
                match (it.next(), it.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Touche::Chiffre(c),
                    _ => Touche::Texte(s.to_string()),
                }
            }
        }
    }
}

/// Ce que la session doit faire après une touche.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effet {
    /// Tampon (ou mémoire) mis à jour, rien d’autre.
    Tampon,
    /// Tampon vidé : la session efface aussi résultat + erreur.
    Effacement,
    /// Soumission demandée (tampon intact).
    Soumission,
}

/// État du pavé : tampon + mémoire + exposant attendu.
#[derive(Clone, Debug, Default)]
pub struct Clavier {
    tampon: String,
    memoire: Option<String>,
    attente_exposant: bool,
}

impl Clavier {
    pub fn tampon(&self) -> &str {
        &self.tampon
    }

    /// Accès direct (champ texte éditable). Appeler `resynchroniser` après édition.
    pub fn tampon_mut(&mut self) -> &mut String {
        &mut self.tampon
    }

    pub fn remplacer_tampon(&mut self, texte: impl Into<String>) {
        self.tampon = texte.into();
        self.resynchroniser();
    }

    pub fn memoire(&self) -> Option<&str> {
        self.memoire.as_deref()
    }

    pub fn attente_exposant(&self) -> bool {
        self.attente_exposant
    }

    /// Après une édition libre : le drapeau suit la présence du □ final.
    pub fn resynchroniser(&mut self) {
        self.attente_exposant = self.tampon.ends_with(MARQUEUR_EXPOSANT);
    }

    /// Applique une touche. `resultat` : texte du dernier résultat (pour M+).
    pub fn appliquer(&mut self, touche: &Touche, resultat: Option<&str>) -> Effet {
        // un chiffre après □ est la seule touche qui consomme le drapeau
        let attendait = std::mem::take(&mut self.attente_exposant);

        match touche {
            Touche::Effacer => {
                self.tampon.clear();
                return Effet::Effacement;
            }
            Touche::Retour => {
                self.tampon.pop();
                self.resynchroniser();
            }
            Touche::Soumettre => {
                self.attente_exposant = attendait;
                return Effet::Soumission;
            }

            Touche::MemoireStocker => {
                let valeur = match resultat {
                    Some(r) => r.to_string(),
                    None if !self.tampon.is_empty() => self.tampon.clone(),
                    None => "0".to_string(),
                };
                self.memoire = Some(valeur);
                self.attente_exposant = attendait;
            }
            Touche::MemoireRappel => {
                if let Some(m) = &self.memoire {
                    self.tampon.push_str(m);
                }
                self.resynchroniser();
            }
            Touche::MemoireEffacer => {
                self.memoire = None;
                self.attente_exposant = attendait;
            }

            Touche::Produit => self.tampon.push(SYMBOLE_PRODUIT),
            Touche::TrigInverse(f) => {
                self.tampon.push_str(f.libelle());
                self.tampon.push('(');
            }
            Touche::Fonction(f) => {
                self.tampon.push_str(f.nom());
                self.tampon.push('(');
            }
            Touche::Racine => self.tampon.push_str("sqrt("),
            Touche::Constante(Constante::Pi) => self.tampon.push('π'),
            Touche::Constante(Constante::E) => self.tampon.push('e'),
            Touche::Puissance => {
                self.tampon.push(MARQUEUR_EXPOSANT);
                self.attente_exposant = true;
            }
            Touche::Chiffre(c) => {
                if attendait && self.tampon.ends_with(MARQUEUR_EXPOSANT) {
                    self.tampon.pop();
                    self.tampon.push(vers_exposant(*c));
                } else {
                    self.tampon.push(*c);
                }
            }
            Touche::Permutation => self.tampon.push('P'),
            Touche::Combinaison => self.tampon.push('C'),
            Touche::Signe => self.tampon = inverser_signe(&self.tampon),
            Touche::Pourcent => self.tampon.push('%'),
            Touche::Factorielle => self.tampon.push('!'),

            Touche::Texte(t) => self.tampon.push_str(t),
        }

        Effet::Tampon
    }

    /// Entoure la sélection [debut, fin) (indices en caractères) de barres de norme.
    ///
    /// Retourne la nouvelle position du curseur : debut + 2 + longueur sélection,
    /// c.-à-d. juste avant les barres fermantes. À l’appelant de la réappliquer
    /// au champ texte après le rendu.
    pub fn envelopper_norme(&mut self, debut: usize, fin: usize) -> usize {
        let n = self.tampon.chars().count();
        let (debut, fin) = (debut.min(fin).min(n), debut.max(fin).min(n));

        let chars: Vec<char> = self.tampon.chars().collect();
        let avant: String = chars[..debut].iter().collect();
        let selection: String = chars[debut..fin].iter().collect();
        let apres: String = chars[fin..].iter().collect();

        self.tampon = format!("{avant}{BARRES_NORME}{selection}{BARRES_NORME}{apres}");
        self.resynchroniser();

        debut + BARRES_NORME.chars().count() + (fin - debut)
    }
}
