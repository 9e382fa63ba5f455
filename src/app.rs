// src/app.rs
//
// Module App (racine)
// -------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (session pure) et Calculatrice (session + réseau)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Réseau:
// - NATIF : runtime tokio possédé par l’app
// - WEB   : wasm_bindgen_futures::spawn_local
// Dans les deux cas la réponse est déposée dans une case partagée, relevée
// à chaque frame puis remise à la session avec son jeton.

pub mod etat;
pub mod vue;

#[cfg(test)]
mod tests_session;

// Ré-export pratique : `use crate::app::AppCalc;`
pub use etat::AppCalc;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use eframe::egui;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::service::{ClientSolveur, ErreurService, ReponseSolve};
use etat::Envoi;

type Case = Arc<Mutex<Option<Result<ReponseSolve, ErreurService>>>>;

/// Erreur de démarrage (remontée à eframe).
pub type ErreurDemarrage = Box<dyn std::error::Error + Send + Sync>;

pub struct Calculatrice {
    session: AppCalc,
    client: ClientSolveur,
    /// Requêtes parties, pas encore relevées : (jeton, case de dépôt).
    en_vol: Vec<(u64, Case)>,
    #[cfg(not(target_arch = "wasm32"))]
    runtime: tokio::runtime::Runtime,
}

impl Calculatrice {
    pub fn new(config: Config) -> Result<Self, ErreurDemarrage> {
        let client = ClientSolveur::new(&config)?;

        #[cfg(not(target_arch = "wasm32"))]
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        info!(url = client.url(), "solveur configuré");

        Ok(Self {
            session: AppCalc::new(config),
            client,
            en_vol: Vec::new(),
            #[cfg(not(target_arch = "wasm32"))]
            runtime,
        })
    }

    fn lancer(&mut self, envoi: Envoi, ctx: &egui::Context) {
        let case: Case = Arc::new(Mutex::new(None));
        self.en_vol.push((envoi.jeton, Arc::clone(&case)));

        let client = self.client.clone();
        let ctx = ctx.clone();
        let tache = async move {
            let resultat = client.resoudre(&envoi.requete).await;
            if let Ok(mut c) = case.lock() {
                *c = Some(resultat);
            }
            ctx.request_repaint();
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.runtime.spawn(tache);

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(tache);
    }

    /// Relève les cases remplies ; la session trie (jeton périmé => ignoré).
    fn relever(&mut self) {
        let session = &mut self.session;
        self.en_vol.retain(|(jeton, case)| {
            let pris = match case.lock() {
                Ok(mut c) => c.take(),
                Err(_) => {
                    warn!(jeton, "case de réponse empoisonnée");
                    return false;
                }
            };
            match pris {
                Some(resultat) => {
                    session.recevoir(*jeton, resultat);
                    false
                }
                None => true,
            }
        });
    }

    /// Raccourcis clavier globaux (hors saisie dans un champ texte).
    fn raccourcis(&mut self, ctx: &egui::Context) -> Option<Envoi> {
        // ESC = C, même si un champ a le focus
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.session.effacer();
            return None;
        }
        if ctx.wants_keyboard_input() {
            return None;
        }

        let mut envoi = None;
        let evenements = ctx.input(|i| i.events.clone());
        for ev in evenements {
            let texte = match ev {
                egui::Event::Text(t) => t,
                egui::Event::Key {
                    key: egui::Key::Enter,
                    pressed: true,
                    ..
                } => "=".to_string(),
                egui::Event::Key {
                    key: egui::Key::Backspace,
                    pressed: true,
                    ..
                } => "⌫".to_string(),
                _ => continue,
            };

            for c in texte.chars() {
                if c.is_ascii_digit() || "+-x/().=⌫".contains(c) {
                    debug!(touche = %c, "raccourci");
                    envoi = self.session.appuyer(&c.to_string()).or(envoi);
                }
            }
        }
        envoi
    }
}

impl eframe::App for Calculatrice {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.relever();

        let mut envois: Vec<Envoi> = self.raccourcis(ctx).into_iter().collect();

        egui::CentralPanel::default().show(ctx, |ui| {
            envois.extend(self.session.ui(ui));
        });

        for envoi in envois {
            self.lancer(envoi, ctx);
        }

        // relance lente tant qu’une requête est en vol
        if self.session.occupe {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}
