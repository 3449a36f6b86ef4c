//! The settings page: profile details, preferences and account deletion.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    alert::Alert,
    api::{ApiClient, AuthToken},
    auth::SessionUser,
    currency::CURRENCIES,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_CHECKBOX_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base, submit_button,
    },
    navigation::NavBar,
    profile::core::{Theme, UserProfile, get_profile},
};

fn profile_form(profile: &UserProfile) -> Markup {
    let currency = profile.currency_code();
    let theme = profile.theme();
    let preferences = profile.notification_preferences;

    html! {
        form
            hx-put=(endpoints::PROFILE_API)
            hx-target-error="#alert-container"
            hx-swap="none"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4"
        {
            div
            {
                label for="display_name" class=(FORM_LABEL_STYLE) { "Name" }
                input
                    type="text"
                    name="display_name"
                    id="display_name"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    value=(profile.name);
            }

            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }
                input
                    type="email"
                    id="email"
                    class=(FORM_TEXT_INPUT_STYLE)
                    disabled
                    value=(profile.email);
            }

            div
            {
                label for="phone_number" class=(FORM_LABEL_STYLE) { "Phone number" }
                input
                    type="tel"
                    name="phone_number"
                    id="phone_number"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(profile.phone_number.as_deref().unwrap_or_default());
            }

            div
            {
                label for="currency" class=(FORM_LABEL_STYLE) { "Currency" }
                select name="currency" id="currency" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for option in &CURRENCIES {
                        option value=(option.code) selected[option.code == currency]
                        {
                            (option.symbol) " " (option.code) " - " (option.name)
                        }
                    }
                }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Theme" }
                div class="flex gap-4"
                {
                    @for option in Theme::ALL {
                        label class="flex items-center gap-2 text-sm"
                        {
                            input
                                type="radio"
                                name="theme"
                                value=(option)
                                checked[option == theme];
                            (capitalise(option.as_str()))
                        }
                    }
                }
            }

            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Notifications" }

                label class="flex items-center gap-2 text-sm"
                {
                    input
                        type="checkbox"
                        name="push_notifications"
                        class=(FORM_CHECKBOX_STYLE)
                        checked[preferences.push];
                    "Budget alerts"
                }

                label class="flex items-center gap-2 text-sm"
                {
                    input
                        type="checkbox"
                        name="email_notifications"
                        class=(FORM_CHECKBOX_STYLE)
                        checked[preferences.email];
                    "Monthly summary e-mails"
                }
            }

            (submit_button("Save changes"))
        }
    }
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn settings_view(profile: &UserProfile, load_error: Option<Markup>) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl space-y-6"
            {
                h1 class="text-xl font-bold" { "Settings" }

                @if let Some(load_error) = load_error {
                    (load_error)
                }

                section class=(CARD_STYLE)
                {
                    h2 class="mb-4 text-lg font-semibold" { "Profile" }
                    (profile_form(profile))
                }

                section class=(CARD_STYLE)
                {
                    h2 class="mb-2 text-lg font-semibold" { "Monthly summary" }
                    p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Get a summary of this month's spending and income sent to " (profile.email) "."
                    }
                    button
                        type="button"
                        hx-post=(endpoints::MONTHLY_SUMMARY_API)
                        hx-target-error="#alert-container"
                        hx-swap="none"
                        hx-disabled-elt="this"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Send monthly summary"
                    }
                }

                section class=(CARD_STYLE)
                {
                    h2 class="mb-2 text-lg font-semibold text-red-600 dark:text-red-500" { "Delete account" }
                    p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
                    {
                        "This permanently deletes your account and all of your data. "
                        "Type your e-mail address to confirm."
                    }

                    form
                        hx-delete=(endpoints::PROFILE_API)
                        hx-target-error="#alert-container"
                        hx-confirm="Are you sure you want to delete your account? This cannot be undone."
                        class="flex flex-col gap-4 sm:flex-row"
                    {
                        input
                            type="email"
                            name="confirm_email"
                            placeholder=(profile.email)
                            aria-label="Confirm e-mail address"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);

                        button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete account" }
                    }
                }
            }
        }
    };

    base("Settings", &[], &content)
}

/// Renders the settings page.
///
/// If the profile cannot be loaded the form is filled from the session
/// instead and an error is shown above it.
pub async fn get_settings_page(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Extension(user): Extension<SessionUser>,
) -> Result<Response, Error> {
    let (profile, load_error) = match get_profile(&api, &token).await {
        Ok(profile) => (profile, None),
        Err(Error::Unauthorized) => return Err(Error::Unauthorized),
        Err(error) => {
            tracing::error!("Could not load profile: {error}");
            let profile = UserProfile {
                name: user.name,
                email: user.email,
                ..Default::default()
            };
            let alert = Alert::Error {
                message: "Failed to load profile".to_owned(),
                details: "Showing your session details, saving will overwrite your profile."
                    .to_owned(),
            }
            .into_html();
            (profile, Some(alert))
        }
    };

    Ok(settings_view(&profile, load_error).into_response())
}
