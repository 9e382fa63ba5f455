// src/service.rs
//
// Solveur distant : POST {base}/api/calc/solve
// --------------------------------------------
// Requête  : { equation, variable, type }
// Succès   : { success: true, result: <nombre | texte | structure>, steps: [texte] }
// Échec    : statut HTTP non-2xx, corps { detail: <texte | autre> }
//
// La chaîne `equation` est opaque ici : c’est le serveur qui l’interprète.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Message quand le serveur ne donne pas de détail textuel.
pub const MESSAGE_GENERIQUE: &str = "Erreur côté serveur.";

/// Longueur max de l’aperçu d’un résultat structuré.
const APERCU_MAX: usize = 80;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeProbleme {
    #[default]
    #[serde(rename = "algebra")]
    Algebre,
    #[serde(rename = "calculus")]
    Calcul,
    #[serde(rename = "trig")]
    Trigo,
    #[serde(rename = "arithmetic")]
    Arithmetique,
}

impl TypeProbleme {
    pub fn libelle(self) -> &'static str {
        match self {
            TypeProbleme::Algebre => "Algèbre",
            TypeProbleme::Calcul => "Calcul",
            TypeProbleme::Trigo => "Trigonométrie",
            TypeProbleme::Arithmetique => "Arithmétique",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequeteSolve {
    pub equation: String,
    pub variable: String,
    #[serde(rename = "type")]
    pub type_probleme: TypeProbleme,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReponseSolve {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl ReponseSolve {
    /// Aperçu court du résultat (historique, mémoire) :
    /// - liste : 3 premiers éléments séparés par ", "
    /// - objet : JSON tronqué à 80 caractères
    /// - texte : tel quel ; null : vide
    pub fn apercu(&self) -> String {
        apercu_valeur(&self.result)
    }

    /// Texte du résultat pour M+ (None si pas de résultat).
    /// Une liste donne ses éléments joints par ',' : ["-2", "2"] -> "-2,2".
    pub fn texte_resultat(&self) -> Option<String> {
        match &self.result {
            Value::Null => None,
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(texte_simple)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            v => Some(texte_simple(v)),
        }
    }
}

fn texte_simple(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        autre => autre.to_string(),
    }
}

pub fn apercu_valeur(v: &Value) -> String {
    match v {
        Value::Array(items) => items
            .iter()
            .take(3)
            .map(texte_simple)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => v.to_string().chars().take(APERCU_MAX).collect(),
        autre => texte_simple(autre),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErreurService {
    #[error("transport: {0}")]
    Transport(String),
    #[error("réponse {statut}: {}", .detail.as_deref().unwrap_or("sans détail"))]
    Reponse { statut: u16, detail: Option<String> },
    #[error("réponse illisible: {0}")]
    Decodage(String),
    #[error("le solveur a signalé un échec")]
    Echec,
}

impl ErreurService {
    /// Message affiché : le `detail` du serveur mot pour mot s’il est textuel.
    pub fn message_utilisateur(&self) -> String {
        match self {
            ErreurService::Reponse {
                detail: Some(d), ..
            } => d.clone(),
            _ => MESSAGE_GENERIQUE.to_string(),
        }
    }
}

/// `detail` du corps d’erreur, seulement s’il est textuel
/// (une erreur de validation FastAPI en renvoie une liste).
pub fn detail_erreur(corps: &str) -> Option<String> {
    let v: Value = serde_json::from_str(corps).ok()?;
    v.get("detail")?.as_str().map(str::to_string)
}

/// Client HTTP du solveur.
#[derive(Clone, Debug)]
pub struct ClientSolveur {
    http: reqwest::Client,
    url: String,
}

impl ClientSolveur {
    pub fn new(config: &Config) -> Result<Self, ErreurService> {
        let builder = reqwest::Client::builder();

        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(30));

        let http = builder
            .build()
            .map_err(|e| ErreurService::Transport(e.to_string()))?;

        Ok(Self {
            http,
            url: config.url_solve(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Un aller-retour. Seul point de suspension de l’application.
    pub async fn resoudre(&self, requete: &RequeteSolve) -> Result<ReponseSolve, ErreurService> {
        debug!(url = %self.url, equation = %requete.equation, "envoi au solveur");

        let response = self
            .http
            .post(&self.url)
            .json(requete)
            .send()
            .await
            .map_err(|e| ErreurService::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let corps = response.text().await.unwrap_or_default();
            let detail = detail_erreur(&corps);
            warn!(statut = status.as_u16(), ?detail, "solveur en échec");
            return Err(ErreurService::Reponse {
                statut: status.as_u16(),
                detail,
            });
        }

        let reponse: ReponseSolve = response
            .json()
            .await
            .map_err(|e| ErreurService::Decodage(e.to_string()))?;

        if !reponse.success {
            return Err(ErreurService::Echec);
        }
        Ok(reponse)
    }
}
