// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI strings per language.
//!
//! Every language provides the same fixed set of strings. Unknown language
//! codes fall back to English.

use crate::models::annotation::Annotation;

/// Static UI strings for one language.
#[derive(Debug)]
pub struct Strings {
    pub code: &'static str,
    pub language_name: &'static str,

    pub menu_file: &'static str,
    pub menu_view: &'static str,
    pub menu_language: &'static str,
    pub open_images: &'static str,
    pub quit: &'static str,
    pub reset_zoom: &'static str,

    pub previous_image: &'static str,
    pub next_image: &'static str,
    pub assign_label: &'static str,
    pub delete_annotation: &'static str,
    pub sticky_label: &'static str,

    pub edit_label_title: &'static str,
    pub edit_label_prompt: &'static str,
    pub assign_label_title: &'static str,
    pub assign_label_prompt: &'static str,
    pub ok: &'static str,
    pub cancel: &'static str,
    pub dismiss: &'static str,

    pub image_filter: &'static str,
    /// Uses `{index}`, `{count}` and `{name}`.
    pub title_pattern: &'static str,
    pub no_image: &'static str,

    pub rect: &'static str,
    pub center: &'static str,
    pub width: &'static str,
    pub height: &'static str,
    pub label: &'static str,
    pub unnamed: &'static str,

    pub save_failed: &'static str,
    pub load_failed: &'static str,
    pub lines_skipped: &'static str,
}

pub const ENGLISH: Strings = Strings {
    code: "en",
    language_name: "English",
    menu_file: "File",
    menu_view: "View",
    menu_language: "Language",
    open_images: "Open image(s)...",
    quit: "Quit",
    reset_zoom: "Fit image",
    previous_image: "◀ Previous",
    next_image: "Next ▶",
    assign_label: "Assign label to selected",
    delete_annotation: "Delete annotation",
    sticky_label: "Last label",
    edit_label_title: "Edit label",
    edit_label_prompt: "Enter new name:",
    assign_label_title: "Assign label",
    assign_label_prompt: "Enter the label for the selected boxes:",
    ok: "OK",
    cancel: "Cancel",
    dismiss: "Dismiss",
    image_filter: "Images",
    title_pattern: "Image {index} of {count} - {name}",
    no_image: "Open one or more images to start labeling",
    rect: "Rect",
    center: "Center",
    width: "Width",
    height: "Height",
    label: "Label",
    unnamed: "Unnamed",
    save_failed: "Could not save labels",
    load_failed: "Could not open image",
    lines_skipped: "malformed label lines skipped",
};

pub const SPANISH: Strings = Strings {
    code: "es",
    language_name: "Español",
    menu_file: "Archivo",
    menu_view: "Ver",
    menu_language: "Idioma",
    open_images: "Abrir imagen(es)...",
    quit: "Salir",
    reset_zoom: "Ajustar imagen",
    previous_image: "◀ Anterior",
    next_image: "Siguiente ▶",
    assign_label: "Asignar etiqueta a seleccionados",
    delete_annotation: "Eliminar anotación",
    sticky_label: "Última etiqueta",
    edit_label_title: "Editar etiqueta",
    edit_label_prompt: "Ingrese nuevo nombre:",
    assign_label_title: "Asignar etiqueta",
    assign_label_prompt: "Ingrese la etiqueta para los seleccionados:",
    ok: "Aceptar",
    cancel: "Cancelar",
    dismiss: "Cerrar",
    image_filter: "Imágenes",
    title_pattern: "Imagen {index} de {count} - {name}",
    no_image: "Abra una o más imágenes para empezar a etiquetar",
    rect: "Rect",
    center: "Centro",
    width: "Ancho",
    height: "Alto",
    label: "Etiqueta",
    unnamed: "Sin nombre",
    save_failed: "No se pudieron guardar las etiquetas",
    load_failed: "No se pudo abrir la imagen",
    lines_skipped: "líneas de etiqueta inválidas omitidas",
};

pub const FRENCH: Strings = Strings {
    code: "fr",
    language_name: "Français",
    menu_file: "Fichier",
    menu_view: "Affichage",
    menu_language: "Langue",
    open_images: "Ouvrir des images...",
    quit: "Quitter",
    reset_zoom: "Ajuster l'image",
    previous_image: "◀ Précédente",
    next_image: "Suivante ▶",
    assign_label: "Étiqueter la sélection",
    delete_annotation: "Supprimer l'annotation",
    sticky_label: "Dernière étiquette",
    edit_label_title: "Modifier l'étiquette",
    edit_label_prompt: "Nouveau nom :",
    assign_label_title: "Étiqueter",
    assign_label_prompt: "Étiquette pour les boîtes sélectionnées :",
    ok: "OK",
    cancel: "Annuler",
    dismiss: "Fermer",
    image_filter: "Images",
    title_pattern: "Image {index} sur {count} - {name}",
    no_image: "Ouvrez une ou plusieurs images pour commencer",
    rect: "Rect",
    center: "Centre",
    width: "Largeur",
    height: "Hauteur",
    label: "Étiquette",
    unnamed: "Sans nom",
    save_failed: "Impossible d'enregistrer les étiquettes",
    load_failed: "Impossible d'ouvrir l'image",
    lines_skipped: "lignes d'étiquettes invalides ignorées",
};

/// All supported languages, in menu order.
pub const LANGUAGES: [&Strings; 3] = [&ENGLISH, &SPANISH, &FRENCH];

/// Strings for a language code such as `"es"` or `"es-MX"`.
pub fn strings_for(code: &str) -> &'static Strings {
    let primary = code
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    LANGUAGES
        .iter()
        .copied()
        .find(|s| s.code == primary)
        .unwrap_or(&ENGLISH)
}

impl Strings {
    /// One list row: center and size in pixels, then the label.
    pub fn summary(&self, annotation: &Annotation) -> String {
        let r = annotation.rect();
        let c = r.center();
        let label = if annotation.is_labeled() {
            annotation.label.as_str()
        } else {
            self.unnamed
        };
        format!(
            "{}: ({}: {:.3}, {:.3}, {}: {:.3}, {}: {:.3}) - {}: {}",
            self.rect,
            self.center,
            c.x,
            c.y,
            self.width,
            r.width,
            self.height,
            r.height,
            self.label,
            label
        )
    }
}
