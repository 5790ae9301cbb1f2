
use std::borrow::Cow;

use fluent_bundle::{FluentBundle, FluentResource};
use unic_langid::{langid, LanguageIdentifier};

pub const AVAILABLE_LANGUAGES: &[(LanguageIdentifier, &str)] = &[
    (langid!("en-US"), include_str!("localization/en.ftl")),
];


pub fn create_fluent_bundle(desired_languages: &Vec<LanguageIdentifier>) -> Result<FluentBundle<FluentResource>, String> {

    let mut bundle = FluentBundle::new(desired_languages.clone());

    for l in desired_languages.iter().rev() {
        let Some((_, s)) = AVAILABLE_LANGUAGES.iter().find(|e| e.0 == *l) else {
            return Err(format!("Language {} not supported", l));
        };
        let resource = FluentResource::try_new((*s).to_owned())
            .map_err(|e| format!("Parsing language {} failed: {:?}", l, e))?;
        bundle.add_resource_overriding(resource);
    }

    Ok(bundle)
}

/// Resolves a message by id, falling back to the id itself.
pub fn tr<'a>(bundle: &'a FluentBundle<FluentResource>, id: &'a str) -> Cow<'a, str> {
    let Some(pattern) = bundle.get_message(id).and_then(|m| m.value()) else {
        return Cow::Borrowed(id);
    };
    let mut errors = vec![];
    bundle.format_pattern(pattern, None, &mut errors)
}
