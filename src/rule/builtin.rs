//! 内置签名库
//! 三类签名：Header 签名、页面内容签名（可带版本提取）、统计/追踪签名
//! 内容签名中 matchers 的顺序只影响证据片段的选取，不影响命中计数

use super::model::{
    AnalyticsKind, AnalyticsSignature, ContentSignature, HeaderRule, HeaderSignature, RawMatcher,
    RuleLibrary, TechnologyCategory,
};

use AnalyticsKind as K;
use TechnologyCategory as C;

fn lit(s: &str) -> RawMatcher {
    RawMatcher::literal(s)
}

fn re(s: &str) -> RawMatcher {
    RawMatcher::pattern(s)
}

/// 匹配任意值（只要 Header 存在即命中）
fn present() -> RawMatcher {
    RawMatcher::pattern("^")
}

fn header(name: &str, rules: Vec<(RawMatcher, &str, TechnologyCategory)>) -> HeaderSignature {
    HeaderSignature {
        header: name.to_string(),
        rules: rules
            .into_iter()
            .map(|(matcher, tech, category)| HeaderRule {
                matcher,
                name: tech.to_string(),
                category,
            })
            .collect(),
    }
}

fn tech(
    name: &str,
    category: TechnologyCategory,
    matchers: Vec<RawMatcher>,
    version: Option<&str>,
) -> ContentSignature {
    ContentSignature {
        name: name.to_string(),
        category,
        matchers,
        version: version.map(str::to_string),
    }
}

fn analytics(name: &str, kind: AnalyticsKind, matchers: Vec<RawMatcher>) -> AnalyticsSignature {
    AnalyticsSignature {
        name: name.to_string(),
        kind,
        matchers,
    }
}

/// 构建内置签名库
pub fn builtin_rule_library() -> RuleLibrary {
    RuleLibrary {
        headers: header_signatures(),
        technologies: content_signatures(),
        analytics: analytics_signatures(),
    }
}

fn header_signatures() -> Vec<HeaderSignature> {
    vec![
        header("server", vec![
            (re(r"(?i)openresty"), "OpenResty", C::Server),
            (re(r"(?i)nginx"), "Nginx", C::Server),
            (lit("Apache-Coyote"), "Apache Tomcat", C::Server),
            (re(r"(?i)^apache"), "Apache", C::Server),
            (lit("Microsoft-IIS"), "IIS", C::Server),
            (re(r"(?i)^cloudflare"), "Cloudflare", C::Server),
            (re(r"(?i)litespeed"), "LiteSpeed", C::Server),
            (re(r"(?i)^caddy"), "Caddy", C::Server),
            (re(r"(?i)^vercel"), "Vercel", C::Server),
            (re(r"(?i)^netlify"), "Netlify", C::Server),
            (re(r"(?i)gunicorn"), "Gunicorn", C::Server),
            (lit("Kestrel"), "Kestrel", C::Server),
            (re(r"(?i)jetty"), "Jetty", C::Server),
            (lit("AmazonS3"), "Amazon S3", C::Server),
            (re(r"^(?:Google Frontend|gws|GSE)$"), "Google Web Server", C::Server),
            (re(r"(?i)^envoy"), "Envoy", C::Server),
            (re(r"(?i)^deno"), "Deno", C::Runtime),
        ]),
        header("x-powered-by", vec![
            (lit("Next.js"), "Next.js", C::FrontendFramework),
            (lit("Nuxt"), "Nuxt.js", C::FrontendFramework),
            (lit("Express"), "Express", C::BackendFramework),
            (lit("ASP.NET"), "ASP.NET", C::BackendFramework),
            (re(r"PHP(?:/[\d.]+)?"), "PHP", C::Runtime),
            (lit("Servlet"), "Java Servlet", C::BackendFramework),
            (lit("Phusion Passenger"), "Phusion Passenger", C::Server),
            (lit("WP Engine"), "WP Engine", C::Other),
            (lit("Craft CMS"), "Craft CMS", C::Cms),
        ]),
        header("x-generator", vec![
            (lit("Drupal"), "Drupal", C::Cms),
            (lit("WordPress"), "WordPress", C::Cms),
            (lit("Hugo"), "Hugo", C::Cms),
        ]),
        header("x-drupal-cache", vec![(present(), "Drupal", C::Cms)]),
        header("x-drupal-dynamic-cache", vec![(present(), "Drupal", C::Cms)]),
        header("x-pingback", vec![(re(r"/xmlrpc\.php"), "WordPress", C::Cms)]),
        header("x-shopify-stage", vec![(present(), "Shopify", C::Ecommerce)]),
        header("x-shopid", vec![(present(), "Shopify", C::Ecommerce)]),
        header("x-magento-cache-debug", vec![(present(), "Magento", C::Ecommerce)]),
        header("x-wix-request-id", vec![(present(), "Wix", C::Cms)]),
        header("x-ghost-cache-status", vec![(present(), "Ghost", C::Cms)]),
        header("x-aspnet-version", vec![(present(), "ASP.NET", C::BackendFramework)]),
        header("x-aspnetmvc-version", vec![(present(), "ASP.NET MVC", C::BackendFramework)]),
        header("x-nextjs-cache", vec![(present(), "Next.js", C::FrontendFramework)]),
        header("x-vercel-id", vec![(present(), "Vercel", C::Server)]),
        header("x-nf-request-id", vec![(present(), "Netlify", C::Server)]),
        header("cf-ray", vec![(present(), "Cloudflare", C::Server)]),
        header("x-amz-cf-id", vec![(present(), "Amazon CloudFront", C::Other)]),
        header("x-github-request-id", vec![(present(), "GitHub Pages", C::Other)]),
        header("x-served-by", vec![(re(r"^cache-"), "Fastly", C::Other)]),
        header("x-varnish", vec![(present(), "Varnish", C::Server)]),
        header("x-litespeed-cache", vec![(present(), "LiteSpeed", C::Server)]),
        header("x-turbo-charged-by", vec![(re(r"(?i)litespeed"), "LiteSpeed", C::Server)]),
        header("set-cookie", vec![
            (lit("laravel_session"), "Laravel", C::BackendFramework),
            (lit("ci_session"), "CodeIgniter", C::BackendFramework),
            (lit("csrftoken"), "Django", C::BackendFramework),
            (lit("_shopify_y"), "Shopify", C::Ecommerce),
            (lit("ASP.NET_SessionId"), "ASP.NET", C::BackendFramework),
            (lit("PHPSESSID"), "PHP", C::Runtime),
            (lit("JSESSIONID"), "Java", C::Runtime),
        ]),
    ]
}

fn content_signatures() -> Vec<ContentSignature> {
    vec![
        // ===== 前端框架 =====
        tech("React", C::FrontendFramework, vec![
            lit("data-reactroot"),
            lit("data-reactid"),
            re(r"/react(?:-dom)?(?:\.production|\.development)?(?:\.min)?\.js"),
            lit("__REACT_DEVTOOLS_GLOBAL_HOOK__"),
            lit("_reactRootContainer"),
        ], Some(r"react(?:-dom)?@(\d+\.\d+\.\d+)")),
        tech("Next.js", C::FrontendFramework, vec![
            lit("__NEXT_DATA__"),
            lit("/_next/static/"),
            lit("/_next/image"),
            re(r#"<next-route-announcer|id="__next""#),
        ], Some(r"next@(\d+\.\d+\.\d+)")),
        tech("Vue.js", C::FrontendFramework, vec![
            re(r"data-v-[0-9a-f]{8}"),
            lit("__VUE__"),
            re(r"vue(?:\.runtime)?(?:\.global)?(?:\.prod)?(?:\.min)?\.js"),
            lit("data-server-rendered"),
        ], Some(r"vue@(\d+\.\d+\.\d+)")),
        tech("Nuxt.js", C::FrontendFramework, vec![
            lit("__NUXT__"),
            lit("/_nuxt/"),
            lit("nuxt-link"),
            lit("data-n-head"),
        ], None),
        tech("Angular", C::FrontendFramework, vec![
            re(r#"ng-version="[^"]*""#),
            lit("_nghost-"),
            lit("_ngcontent-"),
            lit("<app-root"),
        ], Some(r#"ng-version="([^"]+)""#)),
        tech("AngularJS", C::FrontendFramework, vec![
            lit("ng-app"),
            lit("ng-controller"),
            re(r"angular(?:\.min)?\.js"),
            lit("ng-cloak"),
        ], Some(r"angular(?:js)?/(\d+\.\d+\.\d+)/angular")),
        tech("Svelte", C::FrontendFramework, vec![
            re(r#"class="[^"]*\bsvelte-[a-z0-9]+"#),
            lit("__svelte"),
        ], None),
        tech("SvelteKit", C::FrontendFramework, vec![
            lit("__sveltekit"),
            lit("/_app/immutable/"),
            lit("data-sveltekit-"),
        ], None),
        tech("Gatsby", C::FrontendFramework, vec![
            lit("___gatsby"),
            lit("/page-data/"),
            lit("gatsby-focus-wrapper"),
            re(r#"<meta name="generator" content="Gatsby"#),
        ], Some(r#"<meta name="generator" content="Gatsby (\d+\.\d+\.\d+)""#)),
        tech("Remix", C::FrontendFramework, vec![
            lit("__remixContext"),
            lit("__remixManifest"),
            lit("/build/_shared/"),
        ], None),
        tech("Astro", C::FrontendFramework, vec![
            lit("astro-island"),
            re(r"data-astro-cid-[a-z0-9]+"),
            lit("/_astro/"),
            re(r#"<meta name="generator" content="Astro"#),
        ], Some(r#"content="Astro v(\d+\.\d+\.\d+)""#)),
        tech("Ember.js", C::FrontendFramework, vec![
            lit("ember-view"),
            lit("data-ember-action"),
            re(r"ember(?:\.min)?\.js"),
        ], Some(r"ember(?:\.js)?/(\d+\.\d+\.\d+)/")),
        tech("Alpine.js", C::FrontendFramework, vec![
            lit("x-data="),
            lit("x-bind:"),
            re(r"alpinejs(?:@[\d.]+)?"),
        ], Some(r"alpinejs@(\d+\.\d+\.\d+)")),
        tech("Preact", C::FrontendFramework, vec![
            re(r"preact(?:\.min)?\.js"),
            lit("__PREACT_DEVTOOLS__"),
        ], Some(r"preact@(\d+\.\d+\.\d+)")),
        tech("Backbone.js", C::FrontendFramework, vec![
            re(r"backbone(?:-min|\.min)?\.js"),
            lit("Backbone.View"),
        ], Some(r"backbone\.js/(\d+\.\d+\.\d+)/")),

        // ===== 后端框架 =====
        tech("Django", C::BackendFramework, vec![
            lit("csrfmiddlewaretoken"),
            lit("__admin_media_prefix__"),
            lit("/static/admin/"),
        ], None),
        tech("Ruby on Rails", C::BackendFramework, vec![
            re(r#"<meta name="csrf-param" content="authenticity_token""#),
            lit("rails-ujs"),
            lit("data-turbo-track"),
        ], None),
        tech("Laravel", C::BackendFramework, vec![
            lit("laravel_session"),
            lit("window.Laravel"),
            re(r"wire:(?:id|snapshot)="),
        ], None),
        tech("ASP.NET", C::BackendFramework, vec![
            lit("__VIEWSTATE"),
            lit("__EVENTVALIDATION"),
            lit("WebResource.axd"),
            lit("ScriptResource.axd"),
        ], None),
        tech("Phoenix", C::BackendFramework, vec![
            lit("data-phx-main"),
            lit("phx-click"),
            re(r"phoenix(?:_live_view)?(?:\.min)?\.js"),
        ], None),

        // ===== CSS 框架 =====
        tech("Bootstrap", C::CssFramework, vec![
            re(r"bootstrap(?:\.bundle)?(?:\.min)?\.(?:css|js)"),
            lit("data-bs-toggle"),
            lit(r#"data-toggle="collapse""#),
            lit("navbar-expand-"),
        ], Some(r"bootstrap(?:@|/)(\d+\.\d+\.\d+)")),
        tech("Tailwind CSS", C::CssFramework, vec![
            lit("tailwindcss"),
            lit("--tw-"),
            re(r"tailwind(?:\.min)?\.css"),
        ], Some(r"tailwindcss(?:@|\s+v)(\d+\.\d+\.\d+)")),
        tech("Bulma", C::CssFramework, vec![
            re(r"bulma(?:\.min)?\.css"),
            lit("is-primary"),
        ], Some(r"bulma@(\d+\.\d+\.\d+)")),
        tech("Foundation", C::CssFramework, vec![
            re(r"foundation(?:\.min)?\.(?:css|js)"),
            lit("data-off-canvas"),
        ], Some(r"foundation-sites@(\d+\.\d+\.\d+)")),

        // ===== CMS =====
        tech("WordPress", C::Cms, vec![
            lit("/wp-content/"),
            lit("/wp-includes/"),
            lit("wp-json"),
            re(r#"<meta name="generator" content="WordPress"#),
        ], Some(r#"content="WordPress (\d+\.\d+(?:\.\d+)?)""#)),
        tech("Drupal", C::Cms, vec![
            lit("Drupal.settings"),
            lit("/sites/default/files/"),
            re(r"drupal(?:\.min)?\.js"),
            lit("data-drupal-"),
        ], Some(r#"content="Drupal (\d+(?:\.\d+)*)"#)),
        tech("Joomla", C::Cms, vec![
            lit("/media/jui/"),
            lit("/components/com_"),
            re(r#"<meta name="generator" content="Joomla"#),
        ], Some(r#"content="Joomla! (\d+\.\d+)"#)),
        tech("Ghost", C::Cms, vec![
            re(r#"<meta name="generator" content="Ghost"#),
            lit("ghost-portal"),
            lit("/ghost/api/"),
        ], Some(r#"content="Ghost (\d+\.\d+)"#)),
        tech("Wix", C::Cms, vec![
            lit("static.wixstatic.com"),
            lit("wix-code"),
            lit("_wixCIDX"),
        ], None),
        tech("Squarespace", C::Cms, vec![
            lit("static1.squarespace.com"),
            lit("Static.SQUARESPACE_CONTEXT"),
            lit("squarespace-cdn"),
        ], None),
        tech("Webflow", C::Cms, vec![
            lit("data-wf-page"),
            lit("data-wf-site"),
            re(r"webflow(?:\.[a-z0-9]+)*\.js"),
        ], None),
        tech("Hugo", C::Cms, vec![
            re(r#"<meta name="generator" content="Hugo"#),
        ], Some(r#"content="Hugo (\d+\.\d+(?:\.\d+)?)"#)),
        tech("Jekyll", C::Cms, vec![
            re(r#"<meta name="generator" content="Jekyll"#),
        ], Some(r#"content="Jekyll v(\d+\.\d+\.\d+)""#)),

        // ===== 电商 =====
        tech("Shopify", C::Ecommerce, vec![
            lit("cdn.shopify.com"),
            lit("Shopify.theme"),
            lit("shopify-section"),
        ], None),
        tech("WooCommerce", C::Ecommerce, vec![
            lit("woocommerce"),
            lit("wc-cart-fragments"),
            lit("/plugins/woocommerce/"),
        ], Some(r#"content="WooCommerce (\d+\.\d+(?:\.\d+)?)"#)),
        tech("Magento", C::Ecommerce, vec![
            lit("Mage.Cookies"),
            lit("data-mage-init"),
            lit("/static/version"),
            lit("mage/cookies"),
        ], None),
        tech("BigCommerce", C::Ecommerce, vec![
            lit("cdn11.bigcommerce.com"),
            lit("bigcommerce.com/s-"),
        ], None),
        tech("PrestaShop", C::Ecommerce, vec![
            lit("prestashop"),
            lit("/modules/ps_"),
        ], None),

        // ===== 运行时 / 库 =====
        tech("jQuery", C::Library, vec![
            re(r"jquery(?:[.-]\d+\.\d+\.\d+)?(?:\.slim)?(?:\.min)?\.js"),
            lit("jQuery("),
        ], Some(r"jquery[.-](\d+\.\d+\.\d+)(?:\.slim)?(?:\.min)?\.js")),
        tech("Lodash", C::Library, vec![
            re(r"lodash(?:\.min)?\.js"),
        ], Some(r"lodash(?:\.js)?[@/](\d+\.\d+\.\d+)")),
        tech("Moment.js", C::Library, vec![
            re(r"moment(?:-with-locales)?(?:\.min)?\.js"),
        ], Some(r"moment(?:\.js)?[@/](\d+\.\d+\.\d+)")),
        tech("Three.js", C::Library, vec![
            re(r"three(?:\.module)?(?:\.min)?\.js"),
        ], Some(r"three@(\d+\.\d+\.\d+)")),
        tech("D3", C::Library, vec![
            re(r"d3(?:\.v\d+)?(?:\.min)?\.js"),
        ], Some(r"d3\.v(\d+)(?:\.min)?\.js")),
        tech("GSAP", C::Library, vec![
            re(r"gsap(?:\.min)?\.js"),
            re(r"TweenMax(?:\.min)?\.js"),
        ], Some(r"gsap/(\d+\.\d+\.\d+)/")),
        tech("htmx", C::Library, vec![
            re(r"htmx(?:\.org)?(?:@[\d.]+)?(?:/dist/htmx)?(?:\.min)?\.js"),
            re(r#"hx-(?:get|post|put|delete|patch)=""#),
            lit("hx-swap="),
        ], Some(r"htmx\.org@(\d+\.\d+\.\d+)")),
        tech("Font Awesome", C::Library, vec![
            re(r"font-?awesome(?:\.min)?\.css"),
            lit("kit.fontawesome.com"),
            re(r#"class="fa[srlbd]? fa-"#),
        ], Some(r"font-?awesome/(\d+\.\d+\.\d+)/")),
        tech("Google Fonts", C::Other, vec![
            lit("fonts.googleapis.com"),
            lit("fonts.gstatic.com"),
        ], None),
        tech("reCAPTCHA", C::Other, vec![
            lit("www.google.com/recaptcha/"),
            lit("g-recaptcha"),
        ], None),
    ]
}

fn analytics_signatures() -> Vec<AnalyticsSignature> {
    vec![
        analytics("Google Analytics", K::Analytics, vec![
            re(r#"gtag\(\s*['"]config['"]\s*,\s*['"](?:UA|G)-[A-Z0-9-]+['"]"#),
            lit("google-analytics.com/analytics.js"),
            lit("google-analytics.com/ga.js"),
            re(r#"ga\(\s*['"]create['"]"#),
        ]),
        // GA4 独立加载方式；同名签名只取第一个命中
        analytics("Google Analytics", K::Analytics, vec![
            re(r"googletagmanager\.com/gtag/js\?id=G-[A-Z0-9]+"),
        ]),
        analytics("Google Tag Manager", K::Tracking, vec![
            lit("googletagmanager.com/gtm.js"),
            re(r"GTM-[A-Z0-9]{4,}"),
        ]),
        analytics("Facebook Pixel", K::Tracking, vec![
            re(r"connect\.facebook\.net/[A-Za-z_]+/fbevents\.js"),
            re(r#"fbq\(\s*['"]init['"]"#),
        ]),
        analytics("Hotjar", K::Analytics, vec![
            lit("static.hotjar.com"),
            lit("_hjSettings"),
        ]),
        analytics("Mixpanel", K::Analytics, vec![
            lit("cdn.mxpnl.com"),
            lit("mixpanel.init("),
        ]),
        analytics("Segment", K::Analytics, vec![
            lit("cdn.segment.com/analytics.js"),
            lit("analytics.load("),
        ]),
        analytics("Amplitude", K::Analytics, vec![
            lit("cdn.amplitude.com"),
            lit("amplitude.getInstance()"),
        ]),
        analytics("Heap", K::Analytics, vec![
            lit("cdn.heapanalytics.com"),
            lit("heap.load("),
        ]),
        analytics("Plausible", K::Analytics, vec![
            lit("plausible.io/js/"),
        ]),
        analytics("Fathom", K::Analytics, vec![
            lit("cdn.usefathom.com"),
        ]),
        analytics("Matomo", K::Analytics, vec![
            re(r"(?:matomo|piwik)\.js"),
            lit("_paq.push"),
        ]),
        analytics("Microsoft Clarity", K::Analytics, vec![
            lit("clarity.ms/tag/"),
        ]),
        analytics("Adobe Analytics", K::Analytics, vec![
            lit("AppMeasurement"),
            lit("omtrdc.net"),
            re(r"s_code(?:\.min)?\.js"),
        ]),
        analytics("Yandex Metrica", K::Analytics, vec![
            lit("mc.yandex.ru/metrika"),
            lit("yandex_metrika"),
        ]),
        analytics("Baidu Tongji", K::Analytics, vec![
            lit("hm.baidu.com/hm.js"),
        ]),
        analytics("Cloudflare Web Analytics", K::Analytics, vec![
            lit("static.cloudflareinsights.com/beacon.min.js"),
        ]),
        analytics("Vercel Analytics", K::Analytics, vec![
            lit("/_vercel/insights/script.js"),
        ]),
        analytics("LinkedIn Insight Tag", K::Tracking, vec![
            lit("snap.licdn.com/li.lms-analytics/insight.min.js"),
            lit("_linkedin_partner_id"),
        ]),
        analytics("Twitter Pixel", K::Tracking, vec![
            lit("static.ads-twitter.com/uwt.js"),
            re(r#"twq\(\s*['"](?:init|config)['"]"#),
        ]),
        analytics("TikTok Pixel", K::Tracking, vec![
            lit("analytics.tiktok.com"),
            lit("ttq.load("),
        ]),
        analytics("Pinterest Tag", K::Tracking, vec![
            lit("s.pinimg.com/ct/core.js"),
            lit("pintrk("),
        ]),
        analytics("Snap Pixel", K::Tracking, vec![
            lit("sc-static.net/scevent.min.js"),
        ]),
        analytics("HubSpot", K::Marketing, vec![
            lit("js.hs-scripts.com"),
            lit("js.hs-analytics.net"),
            lit("_hsq.push"),
        ]),
        analytics("Marketo", K::Marketing, vec![
            lit("munchkin.marketo.net"),
            lit("Munchkin.init("),
        ]),
        analytics("Intercom", K::Marketing, vec![
            lit("widget.intercom.io"),
            re(r#"Intercom\(\s*['"]boot['"]"#),
        ]),
        analytics("Mailchimp", K::Marketing, vec![
            lit("chimpstatic.com"),
            lit("list-manage.com"),
        ]),
        analytics("Klaviyo", K::Marketing, vec![
            lit("static.klaviyo.com"),
        ]),
    ]
}
