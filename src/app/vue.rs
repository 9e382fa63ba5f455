// src/app/vue.rs
//
// Vue (UI egui) : natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Vue mince : toute mutation passe par une méthode de session
// - Clavier : Enter soumet (quand le champ est focus)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
// - La vue ne fait pas de réseau : elle rend l’éventuel `Envoi` à app.rs
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;
use egui::text::CCursor;
use egui::text_selection::CCursorRange;

use super::etat::{AppCalc, Envoi};
use crate::noyau::graphe::{SerieGraphe, X_MAX, X_MIN};
use crate::noyau::{Mode, Touche};
use crate::service::TypeProbleme;

const ID_ENTREE: &str = "entree_equation";

/// Pavé scientifique (4 colonnes).
const PAVE_SCIENTIFIQUE: [[&str; 4]; 5] = [
    ["sin", "cos", "tan", "√"],
    ["sin⁻¹", "cos⁻¹", "tan⁻¹", "xʸ"],
    ["log", "ln", "π", "e"],
    ["nPr", "nCr", "x!", "%"],
    ["(", ")", "±", "⌫"],
];

/// Pavé numérique (4 colonnes).
const PAVE_NUMERIQUE: [[&str; 4]; 4] = [
    ["7", "8", "9", "/"],
    ["4", "5", "6", "×"],
    ["1", "2", "3", "-"],
    ["0", ".", "=", "+"],
];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<Envoi> {
        let mut envoi = None;

        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Résolveur d’équations");
                ui.add_space(6.0);

                self.ui_selecteurs(ui);
                ui.add_space(6.0);

                envoi = self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultats(ui);
                self.ui_graphe(ui);
                self.ui_demarche(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_historique(ui);
            });

        envoi
    }

    fn ui_selecteurs(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut mode = self.mode;
            ui.selectable_value(&mut mode, Mode::Symbolique, "Symbolique");
            ui.selectable_value(&mut mode, Mode::Arithmetique, "Arithmétique");
            if mode != self.mode {
                self.changer_mode(mode);
            }

            if self.mode == Mode::Symbolique {
                ui.separator();

                let mut type_probleme = self.type_probleme;
                egui::ComboBox::from_id_salt("type_probleme")
                    .selected_text(type_probleme.libelle())
                    .show_ui(ui, |ui| {
                        for t in [TypeProbleme::Algebre, TypeProbleme::Calcul, TypeProbleme::Trigo] {
                            ui.selectable_value(&mut type_probleme, t, t.libelle());
                        }
                    });
                if type_probleme != self.type_probleme {
                    self.set_type(type_probleme);
                }

                ui.label("Variable :");
                let resp = ui.add(egui::TextEdit::singleline(&mut self.variable).desired_width(32.0));
                if resp.lost_focus() {
                    let v = self.variable.clone();
                    self.set_variable(&v);
                } else if resp.changed() {
                    self.rafraichir_graphe();
                }
            }
        });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) -> Option<Envoi> {
        let mut envoi = None;
        let id = egui::Id::new(ID_ENTREE);

        ui.label("Équation :");

        let indice = match self.mode {
            Mode::Symbolique => "Ex: x²-4=0, sin(x)+1, ||[3,4]||",
            Mode::Arithmetique => "Ex: 12×3+4!, 5C2, 200×15%",
        };

        let resp = ui.add(
            egui::TextEdit::singleline(self.clavier.tampon_mut())
                .id(id)
                .desired_width(ui.available_width())
                .hint_text(indice)
                .code_editor(),
        );
        if resp.changed() {
            self.tampon_edite();
        }

        // Si on a cliqué un bouton, on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // Enter soumet (seulement si le champ est focus)
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (resp.has_focus() || resp.lost_focus()) && enter {
            envoi = self.soumettre();
        }

        ui.add_space(6.0);

        // Actions
        ui.horizontal(|ui| {
            let occupe = self.occupe;

            let resoudre = ui.add_enabled(!occupe, egui::Button::new("Résoudre").min_size(egui::vec2(96.0, 30.0)));
            if resoudre.clicked() {
                envoi = self.soumettre();
            }

            let norme = ui
                .add_enabled(!occupe, egui::Button::new("Norme").min_size(egui::vec2(72.0, 30.0)))
                .on_hover_text("Norme d’un vecteur : [3,4], {4,3,0}, [1,2]+[3,4]");
            if norme.clicked() {
                envoi = self.trouver_norme();
            }

            let barres = ui
                .add_sized([46.0, 30.0], egui::Button::new("||"))
                .on_hover_text("Entoure la sélection de barres de norme");
            if barres.clicked() {
                self.ui_envelopper_selection(ui.ctx(), id);
            }

            if occupe {
                ui.spinner();
            }
        });

        ui.add_space(8.0);

        // Mémoire
        ui.horizontal(|ui| {
            for l in ["MC", "MR", "M+", "C"] {
                if ui.add_sized([46.0, 28.0], egui::Button::new(l)).clicked() {
                    envoi = self.appuyer(l).or(envoi.take());
                }
            }
            if let Some(m) = self.clavier.memoire() {
                ui.weak(format!("M = {m}"));
            }
        });

        ui.add_space(6.0);

        ui.horizontal_top(|ui| {
            if let Some(e) = self.ui_pave(ui, "pave_scientifique", &PAVE_SCIENTIFIQUE) {
                envoi = Some(e);
            }
            ui.separator();
            if let Some(e) = self.ui_pave(ui, "pave_numerique", &PAVE_NUMERIQUE) {
                envoi = Some(e);
            }
        });

        // Variable en un clic (mode symbolique)
        if self.mode == Mode::Symbolique {
            let var = self.variable.clone();
            if ui.add_sized([46.0, 28.0], egui::Button::new(var.as_str())).clicked() {
                self.touche(Touche::Texte(var));
            }
        }

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }

        envoi
    }

    fn ui_pave<const N: usize>(
        &mut self,
        ui: &mut egui::Ui,
        id: &str,
        lignes: &[[&str; 4]; N],
    ) -> Option<Envoi> {
        let mut envoi = None;
        egui::Grid::new(id)
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in lignes {
                    for l in ligne {
                        let resp = ui.add_sized([52.0, 32.0], egui::Button::new(*l));
                        if resp.clicked() {
                            envoi = self.appuyer(l).or(envoi.take());
                        }
                    }
                    ui.end_row();
                }
            });
        envoi
    }

    /// Sélection du champ (indices en caractères) -> barres de norme, puis curseur replacé.
    fn ui_envelopper_selection(&mut self, ctx: &egui::Context, id: egui::Id) {
        let n = self.tampon().chars().count();
        let mut etat = egui::TextEdit::load_state(ctx, id).unwrap_or_default();

        let (debut, fin) = etat
            .cursor
            .char_range()
            .map(|r| {
                let (a, b) = (r.primary.index, r.secondary.index);
                (a.min(b), a.max(b))
            })
            .unwrap_or((n, n));

        let curseur = self.envelopper_norme(debut, fin);
        etat.cursor
            .set_char_range(Some(CCursorRange::one(CCursor::new(curseur))));
        etat.store(ctx, id);
    }

    fn ui_resultats(&mut self, ui: &mut egui::Ui) {
        let Some(reponse) = &self.reponse else {
            return;
        };

        ui.label("Résultat :");
        let texte = match &reponse.result {
            serde_json::Value::String(s) => s.clone(),
            v => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
        };
        Self::champ_monospace(ui, "resultat_out", &texte, 2);

        if !reponse.steps.is_empty() {
            ui.add_space(6.0);
            egui::CollapsingHeader::new("Étapes du solveur")
                .default_open(true)
                .show(ui, |ui| {
                    for (k, etape) in reponse.steps.iter().enumerate() {
                        ui.monospace(format!("{}. {etape}", k + 1));
                    }
                });
        }
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        if self.demarche.is_empty() {
            return;
        }
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                for (nom, texte) in &self.demarche {
                    ui.horizontal(|ui| {
                        ui.label(format!("{nom} :"));
                        ui.monospace(texte);
                    });
                }
            });
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        ui.label("Historique :");
        if self.historique.is_empty() {
            ui.weak("vide");
            return;
        }

        let mut rappel = None;
        for h in &self.historique {
            ui.horizontal(|ui| {
                ui.weak(&h.horodatage);
                ui.small(h.type_probleme.libelle());
                if ui.link(&h.equation).clicked() {
                    rappel = Some(h.equation.clone());
                }
                ui.monospace(format!("→ {}", h.apercu));
            });
        }

        if let Some(eq) = rappel {
            self.rappeler(&eq);
        }
    }

    fn ui_graphe(&mut self, ui: &mut egui::Ui) {
        let Some(serie) = &self.graphe else {
            return;
        };

        ui.add_space(6.0);
        ui.label(&serie.libelle);

        let largeur = ui.available_width().min(480.0);
        let (resp, painter) = ui.allocate_painter(egui::vec2(largeur, 220.0), egui::Sense::hover());
        let cadre = resp.rect;

        painter.rect_filled(cadre, 4.0, ui.visuals().extreme_bg_color);
        tracer_serie(&painter, cadre, serie, ui.visuals());
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }
}

/// Axes + courbe ; la polyligne est coupée à chaque point indéfini.
fn tracer_serie(painter: &egui::Painter, cadre: egui::Rect, serie: &SerieGraphe, visuels: &egui::Visuals) {
    let Some((mut y_min, mut y_max)) = serie.bornes_y() else {
        return;
    };
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let vers_ecran = |x: f64, y: f64| {
        let tx = ((x - X_MIN) / (X_MAX - X_MIN)) as f32;
        let ty = ((y - y_min) / (y_max - y_min)) as f32;
        egui::pos2(
            cadre.left() + tx * cadre.width(),
            cadre.bottom() - ty * cadre.height(),
        )
    };

    let axe = egui::Stroke::new(1.0, visuels.weak_text_color());
    if y_min <= 0.0 && y_max >= 0.0 {
        painter.line_segment([vers_ecran(X_MIN, 0.0), vers_ecran(X_MAX, 0.0)], axe);
    }
    painter.line_segment([vers_ecran(0.0, y_min), vers_ecran(0.0, y_max)], axe);

    let trait_courbe = egui::Stroke::new(2.0, visuels.selection.bg_fill);
    let mut morceau: Vec<egui::Pos2> = Vec::new();
    for &(x, y) in &serie.points {
        match y {
            Some(y) => morceau.push(vers_ecran(x, y)),
            None => {
                if morceau.len() > 1 {
                    painter.add(egui::Shape::line(std::mem::take(&mut morceau), trait_courbe));
                }
                morceau.clear();
            }
        }
    }
    if morceau.len() > 1 {
        painter.add(egui::Shape::line(morceau, trait_courbe));
    }
}
