// src/config.rs
//
// Configuration (natif + web)
// ---------------------------
// - NATIF : variable d’environnement CALC_API_URL (sinon serveur local)
// - WEB   : CALC_API_URL figée à la compilation, sinon l’origine de la page

/// Serveur local par défaut (développement).
const API_URL_DEFAUT: &str = "http://127.0.0.1:8000";

/// Nom de la variable d’environnement.
pub const VAR_API_URL: &str = "CALC_API_URL";

/// Nombre d’entrées gardées dans l’historique.
pub const TAILLE_HISTORIQUE: usize = 6;

/// Variable libre par défaut (mode symbolique).
pub const VARIABLE_DEFAUT: &str = "x";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub taille_historique: usize,
    pub variable_defaut: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: API_URL_DEFAUT.to_string(),
            taille_historique: TAILLE_HISTORIQUE,
            variable_defaut: VARIABLE_DEFAUT.to_string(),
        }
    }
}

impl Config {
    /// Lit l’environnement (natif).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn depuis_env() -> Self {
        let url = std::env::var(VAR_API_URL).ok();
        Self::avec_url(url.as_deref())
    }

    /// Web : valeur de compilation, sinon origine de la page.
    #[cfg(target_arch = "wasm32")]
    pub fn depuis_env() -> Self {
        let origine = web_sys::window().and_then(|w| w.location().origin().ok());
        let url = option_env!("CALC_API_URL").map(str::to_string).or(origine);
        Self::avec_url(url.as_deref())
    }

    /// URL vide ou absente => défaut. '/' final retiré.
    pub fn avec_url(url: Option<&str>) -> Self {
        let api_base_url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(API_URL_DEFAUT)
            .trim_end_matches('/')
            .to_string();

        Self {
            api_base_url,
            ..Self::default()
        }
    }

    /// Point d’entrée du solveur.
    pub fn url_solve(&self) -> String {
        format!("{}/api/calc/solve", self.api_base_url)
    }
}
