//! # Command Line Interface
//!
//! Thin consumer over the [`Store`]: every subcommand restores the saved
//! session, dispatches the matching store operation(s), then prints from a
//! state snapshot. Slice failures surface as plain alert lines.
//!
//! Command groups:
//! - `login` / `logout` / `signup` / `whoami` / `refresh` - session management
//! - `spots ...` - browse, search and rate tourist spots
//! - `packages ...` - browse and manage tour packages
//! - `bookings ...` - create and track bookings
//! - `ratings ...` - package reviews
//! - `company ...` - company dashboard and spot management
//! - `admin ...` - user administration and the spot approval queue
//! - `profile ...` - account details and password changes
//! - `ping` - backend health check

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::{PackageQuery, SpotQuery, UserQuery};
use crate::models::{
    Booking, BookingDraft, BookingStatus, BookingSummary, GeoPoint, NewUser, PackageDraft,
    PackageStatus, ProfileUpdate, Rating, RatingDraft, SpotDraft, SpotRating, SpotRatingDraft,
    TourPackage, TouristSpot, User, UserRole,
};
use crate::store::{self, Store};

// ============================================================================
// Argument Parser
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "wayfarer", about = "Tourist spot and tour package booking client", version)]
pub struct Cli {
    /// Override the API base URL for this invocation
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign out and drop the persisted session
    Logout,

    /// Create a new account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        phone: Option<String>,
        /// Account type to register as
        #[arg(long, default_value_t, value_enum)]
        role: RoleArg,
    },

    /// Show the signed-in account
    Whoami,

    /// Exchange the saved token for a fresh one
    Refresh,

    /// Tourist spot commands
    #[command(subcommand)]
    Spots(SpotsCommand),

    /// Tour package commands
    #[command(subcommand)]
    Packages(PackagesCommand),

    /// Booking commands
    #[command(subcommand)]
    Bookings(BookingsCommand),

    /// Package rating commands
    #[command(subcommand)]
    Ratings(RatingsCommand),

    /// Travel company commands
    #[command(subcommand)]
    Company(CompanyCommand),

    /// Administration commands
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Profile commands
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Check backend connectivity
    Ping,
}

#[derive(Subcommand, Debug)]
pub enum SpotsCommand {
    /// List approved tourist spots
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Full-text search across spots
    Search { term: String },
    /// Show one spot in detail
    Show { id: String },
    /// Rate a spot (1-5)
    Rate {
        id: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        review: Option<String>,
    },
    /// List the ratings left on a spot
    Ratings { id: String },
}

#[derive(Subcommand, Debug)]
pub enum PackagesCommand {
    /// List tour packages
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Search packages by name or destination
    Search { term: String },
    /// Show one package in detail
    Show { id: String },
    /// Publish a new package (travel companies)
    Create(PackageDraftArgs),
    /// Replace an existing package
    Update {
        id: String,
        #[command(flatten)]
        draft: PackageDraftArgs,
    },
    /// Delete a package
    Delete { id: String },
    /// List the signed-in company's packages
    Mine,
}

#[derive(Subcommand, Debug)]
pub enum BookingsCommand {
    /// List the signed-in user's bookings
    List,
    /// Book a package or a spot (exactly one of --package / --spot)
    Create {
        #[arg(long)]
        package: Option<String>,
        #[arg(long)]
        spot: Option<String>,
        #[arg(long, default_value_t = 1)]
        participants: u32,
        #[arg(long)]
        total: f64,
        /// Travel day as YYYY-MM-DD
        #[arg(long)]
        travel_date: Option<String>,
        #[arg(long)]
        contact_phone: Option<String>,
        #[arg(long)]
        emergency_name: Option<String>,
        #[arg(long)]
        emergency_number: Option<String>,
        #[arg(long)]
        special_requests: Option<String>,
    },
    /// Cancel a booking
    Cancel { id: String },
    /// Move a booking to a new status (companies)
    Status {
        id: String,
        #[arg(value_enum)]
        status: BookingStatusArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum RatingsCommand {
    /// Rate a tour package (1-5)
    Rate {
        package: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        review: Option<String>,
        /// Booking the review refers to
        #[arg(long)]
        booking: Option<String>,
    },
    /// List the ratings left on a package
    Package { id: String },
    /// List the signed-in user's ratings
    Mine,
}

#[derive(Subcommand, Debug)]
pub enum CompanyCommand {
    /// Fetch company bookings and packages side by side
    Dashboard,
    /// List the company's own spots, whatever their approval state
    Spots,
    /// Submit a new spot for approval
    AddSpot(SpotDraftArgs),
    /// Replace one of the company's spots
    UpdateSpot {
        id: String,
        #[command(flatten)]
        draft: SpotDraftArgs,
    },
    /// Delete one of the company's spots
    RemoveSpot { id: String },
    /// List bookings made against the company's offerings
    Bookings,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// List registered users
    Users {
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Activate a user account
    Activate { id: String },
    /// Deactivate a user account
    Deactivate { id: String },
    /// Show one user in detail
    ShowUser { id: String },
    /// List spots awaiting approval
    PendingSpots,
    /// Approve a pending spot
    ApproveSpot { id: String },
    /// Reject a pending spot
    RejectSpot { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Fetch and show the signed-in account
    Show,
    /// Update profile fields (only the given flags change)
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        picture: Option<String>,
    },
    /// Change the account password
    ChangePassword {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
}

// ============================================================================
// Argument Helper Types
// ============================================================================

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum RoleArg {
    #[default]
    Tourist,
    TravelCompany,
    Admin,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Tourist => UserRole::Tourist,
            RoleArg::TravelCompany => UserRole::TravelCompany,
            RoleArg::Admin => UserRole::Admin,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BookingStatusArg {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl From<BookingStatusArg> for BookingStatus {
    fn from(status: BookingStatusArg) -> Self {
        match status {
            BookingStatusArg::Pending => BookingStatus::Pending,
            BookingStatusArg::Confirmed => BookingStatus::Confirmed,
            BookingStatusArg::Cancelled => BookingStatus::Cancelled,
            BookingStatusArg::Completed => BookingStatus::Completed,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PackageStatusArg {
    Active,
    Inactive,
}

impl From<PackageStatusArg> for PackageStatus {
    fn from(status: PackageStatusArg) -> Self {
        match status {
            PackageStatusArg::Active => PackageStatus::Active,
            PackageStatusArg::Inactive => PackageStatus::Inactive,
        }
    }
}

/// Flag set for creating or replacing a tour package.
#[derive(Args, Debug)]
pub struct PackageDraftArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    price: f64,
    /// Trip length in days
    #[arg(long, default_value_t = 1)]
    duration: u32,
    #[arg(long, default_value_t = 10)]
    max_participants: u32,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    difficulty: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    latitude: Option<f64>,
    #[arg(long)]
    longitude: Option<f64>,
    /// Repeatable image URL
    #[arg(long = "image-url")]
    image_urls: Vec<String>,
    /// Repeatable departure day as YYYY-MM-DD
    #[arg(long = "date")]
    dates: Vec<String>,
    /// Repeatable destination name
    #[arg(long = "destination")]
    destinations: Vec<String>,
    /// Repeatable included item
    #[arg(long = "include")]
    includes: Vec<String>,
    /// Repeatable excluded item
    #[arg(long = "exclude")]
    excludes: Vec<String>,
    #[arg(long, value_enum)]
    status: Option<PackageStatusArg>,
}

impl PackageDraftArgs {
    fn into_draft(self) -> Result<PackageDraft, String> {
        let mut available_dates = Vec::with_capacity(self.dates.len());
        for raw in &self.dates {
            available_dates.push(parse_day(raw)?);
        }
        let location = match (&self.address, self.latitude, self.longitude) {
            (None, None, None) => None,
            _ => Some(GeoPoint {
                latitude: self.latitude.unwrap_or_default(),
                longitude: self.longitude.unwrap_or_default(),
                address: self.address.unwrap_or_default(),
            }),
        };
        Ok(PackageDraft {
            name: self.name,
            description: self.description,
            price: self.price,
            duration_days: self.duration,
            max_participants: self.max_participants,
            category: self.category,
            difficulty_level: self.difficulty,
            location,
            image_urls: self.image_urls,
            available_dates,
            destinations: self.destinations,
            includes: self.includes,
            excludes: self.excludes,
            itinerary: Vec::new(),
            status: self.status.map(PackageStatus::from),
        })
    }
}

/// Flag set for creating or replacing a tourist spot.
#[derive(Args, Debug)]
pub struct SpotDraftArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long, default_value_t = 0.0)]
    latitude: f64,
    #[arg(long, default_value_t = 0.0)]
    longitude: f64,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long)]
    region: Option<String>,
    /// Repeatable category tag
    #[arg(long = "category")]
    categories: Vec<String>,
    /// Repeatable image URL
    #[arg(long = "image-url")]
    image_urls: Vec<String>,
    #[arg(long)]
    best_time: Option<String>,
}

impl SpotDraftArgs {
    fn into_draft(self) -> SpotDraft {
        SpotDraft {
            name: self.name,
            description: self.description,
            location: GeoPoint {
                latitude: self.latitude,
                longitude: self.longitude,
                address: self.address,
            },
            region: self.region,
            categories: self.categories,
            image_urls: self.image_urls,
            best_time_to_visit: self.best_time,
        }
    }
}

/// Parses a `YYYY-MM-DD` flag into the midnight-UTC timestamp the backend
/// expects for calendar days.
fn parse_day(raw: &str) -> Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("Invalid date '{raw}', expected YYYY-MM-DD"))
}

// ============================================================================
// Command Handlers
// ============================================================================

/// Run one CLI command against the store.
///
/// Restores any saved session first so authenticated commands work without
/// an explicit login step per invocation.
pub async fn run(store: &Store, command: Command) -> Result<(), String> {
    store::auth::restore_session(store).await;

    match command {
        Command::Login { email, password } => {
            let user = store::auth::login(store, &email, &password).await?;
            println!("Signed in as {} ({})", user.full_name, user.email);
            Ok(())
        }
        Command::Logout => {
            store::auth::logout(store).await;
            println!("Signed out.");
            Ok(())
        }
        Command::Signup {
            email,
            password,
            full_name,
            phone,
            role,
        } => {
            let new_user = NewUser {
                email,
                password,
                full_name,
                phone_number: phone,
                role: role.into(),
            };
            let user = store::auth::register(store, &new_user).await?;
            println!("Account created for {} ({})", user.full_name, user.email);
            println!("Sign in with 'wayfarer login' to continue.");
            Ok(())
        }
        Command::Whoami => {
            let state = store.read().await;
            match &state.auth.user {
                Some(user) => print_user_detail(user),
                None => println!("Not signed in."),
            }
            Ok(())
        }
        Command::Refresh => {
            let user = store::auth::refresh_session(store).await?;
            println!("Session refreshed for {}", user.email);
            Ok(())
        }
        Command::Spots(command) => run_spots(store, command).await,
        Command::Packages(command) => run_packages(store, command).await,
        Command::Bookings(command) => run_bookings(store, command).await,
        Command::Ratings(command) => run_ratings(store, command).await,
        Command::Company(command) => run_company(store, command).await,
        Command::Admin(command) => run_admin(store, command).await,
        Command::Profile(command) => run_profile(store, command).await,
        Command::Ping => {
            let reply = store
                .api()
                .health_check()
                .await
                .map_err(|e| e.user_message())?;
            println!("Backend is up: {reply}");
            Ok(())
        }
    }
}

async fn run_spots(store: &Store, command: SpotsCommand) -> Result<(), String> {
    match command {
        SpotsCommand::List {
            search,
            region,
            category,
            limit,
        } => {
            let query = SpotQuery {
                search,
                region,
                category,
                limit,
                ..SpotQuery::default()
            };
            store::tourist_spots::fetch_spots(store, &query).await?;
            let state = store.read().await;
            print_spots(&state.spots.items);
            Ok(())
        }
        SpotsCommand::Search { term } => {
            store::tourist_spots::search_spots(store, &term).await?;
            let state = store.read().await;
            print_spots(&state.spots.items);
            Ok(())
        }
        SpotsCommand::Show { id } => {
            store::tourist_spots::select_spot(store, &id).await?;
            let state = store.read().await;
            if let Some(spot) = &state.spots.selected {
                print_spot_detail(spot);
            }
            Ok(())
        }
        SpotsCommand::Rate { id, rating, review } => {
            let draft = SpotRatingDraft { rating, review };
            let rating = store::tourist_spots::rate_spot(store, &id, &draft).await?;
            println!("Rated spot {} at {}/5.", rating.tourist_spot_id, rating.rating);
            Ok(())
        }
        SpotsCommand::Ratings { id } => {
            store::tourist_spots::fetch_spot_ratings(store, &id).await?;
            let state = store.read().await;
            match state.spots.ratings.get(&id) {
                Some(ratings) => print_spot_ratings(ratings),
                None => println!("No ratings found."),
            }
            Ok(())
        }
    }
}

async fn run_packages(store: &Store, command: PackagesCommand) -> Result<(), String> {
    match command {
        PackagesCommand::List {
            search,
            min_price,
            max_price,
            duration,
            limit,
        } => {
            let query = PackageQuery {
                search,
                min_price,
                max_price,
                duration,
                limit,
                ..PackageQuery::default()
            };
            store::tour_packages::fetch_packages(store, &query).await?;
            let state = store.read().await;
            print_packages(&state.packages.items);
            Ok(())
        }
        PackagesCommand::Search { term } => {
            let query = PackageQuery {
                search: Some(term),
                ..PackageQuery::default()
            };
            store::tour_packages::fetch_packages(store, &query).await?;
            let state = store.read().await;
            print_packages(&state.packages.items);
            Ok(())
        }
        PackagesCommand::Show { id } => {
            store::tour_packages::select_package(store, &id).await?;
            let state = store.read().await;
            if let Some(package) = &state.packages.selected {
                print_package_detail(package);
            }
            Ok(())
        }
        PackagesCommand::Create(args) => {
            let draft = args.into_draft()?;
            let package = store::tour_packages::create_package(store, &draft).await?;
            println!("Created package {} ({})", package.name, package.id);
            Ok(())
        }
        PackagesCommand::Update { id, draft } => {
            let draft = draft.into_draft()?;
            let package = store::tour_packages::update_package(store, &id, &draft).await?;
            println!("Updated package {} ({})", package.name, package.id);
            Ok(())
        }
        PackagesCommand::Delete { id } => {
            store::tour_packages::delete_package(store, &id).await?;
            println!("Deleted package {id}.");
            Ok(())
        }
        PackagesCommand::Mine => {
            store::tour_packages::fetch_company_packages(store).await?;
            let state = store.read().await;
            print_packages(&state.packages.company);
            Ok(())
        }
    }
}

async fn run_bookings(store: &Store, command: BookingsCommand) -> Result<(), String> {
    match command {
        BookingsCommand::List => {
            store::bookings::fetch_user_bookings(store).await?;
            let state = store.read().await;
            print_bookings(&state.bookings.items);
            Ok(())
        }
        BookingsCommand::Create {
            package,
            spot,
            participants,
            total,
            travel_date,
            contact_phone,
            emergency_name,
            emergency_number,
            special_requests,
        } => {
            let travel_date = match travel_date {
                Some(raw) => Some(parse_day(&raw)?),
                None => None,
            };
            let draft = BookingDraft {
                tour_package_id: package,
                tourist_spot_id: spot,
                participants_count: participants,
                total_amount: total,
                travel_date,
                contact_phone,
                emergency_contact_name: emergency_name,
                emergency_contact_number: emergency_number,
                special_requests,
            };
            let booking = store::bookings::create_booking(store, &draft).await?;
            match &booking.booking_reference {
                Some(reference) => println!("Booked. Reference: {reference}"),
                None => println!("Booked. Id: {}", booking.id),
            }
            Ok(())
        }
        BookingsCommand::Cancel { id } => {
            let booking = store::bookings::cancel_booking(store, &id).await?;
            println!("Booking {} is now {}.", booking.id, booking.status);
            Ok(())
        }
        BookingsCommand::Status { id, status } => {
            let booking =
                store::bookings::update_booking_status(store, &id, status.into()).await?;
            println!("Booking {} is now {}.", booking.id, booking.status);
            Ok(())
        }
    }
}

async fn run_ratings(store: &Store, command: RatingsCommand) -> Result<(), String> {
    match command {
        RatingsCommand::Rate {
            package,
            rating,
            review,
            booking,
        } => {
            let draft = RatingDraft {
                tour_package_id: package,
                rating,
                review,
                booking_id: booking,
            };
            let rating = store::ratings::create_rating(store, &draft).await?;
            println!("Rated package {} at {}/5.", rating.tour_package_id, rating.rating);
            Ok(())
        }
        RatingsCommand::Package { id } => {
            store::ratings::fetch_package_ratings(store, &id).await?;
            let state = store.read().await;
            match state.ratings.package_ratings.get(&id) {
                Some(ratings) => print_ratings(ratings),
                None => println!("No ratings found."),
            }
            Ok(())
        }
        RatingsCommand::Mine => {
            store::ratings::fetch_user_ratings(store).await?;
            let state = store.read().await;
            print_ratings(&state.ratings.user_ratings);
            Ok(())
        }
    }
}

async fn run_company(store: &Store, command: CompanyCommand) -> Result<(), String> {
    match command {
        CompanyCommand::Dashboard => {
            // Two independent dispatches; each failure prints on its own.
            let (bookings, packages) = tokio::join!(
                store::bookings::fetch_company_bookings(store),
                store::tour_packages::fetch_company_packages(store),
            );
            if let Err(message) = &bookings {
                eprintln!("bookings: {message}");
            }
            if let Err(message) = &packages {
                eprintln!("packages: {message}");
            }
            let state = store.read().await;
            if bookings.is_ok() {
                println!("=== Bookings ===");
                print_company_bookings(&state.bookings.company);
            }
            if packages.is_ok() {
                println!("=== Packages ===");
                print_packages(&state.packages.company);
            }
            if bookings.is_err() && packages.is_err() {
                return Err("Dashboard unavailable.".to_string());
            }
            Ok(())
        }
        CompanyCommand::Spots => {
            store::tourist_spots::fetch_my_spots(store).await?;
            let state = store.read().await;
            print_spots(&state.spots.my_spots);
            Ok(())
        }
        CompanyCommand::AddSpot(args) => {
            let spot = store::tourist_spots::create_spot(store, &args.into_draft()).await?;
            println!("Submitted spot {} ({}) for approval.", spot.name, spot.id);
            Ok(())
        }
        CompanyCommand::UpdateSpot { id, draft } => {
            let spot = store::tourist_spots::update_spot(store, &id, &draft.into_draft()).await?;
            println!("Updated spot {} ({})", spot.name, spot.id);
            Ok(())
        }
        CompanyCommand::RemoveSpot { id } => {
            store::tourist_spots::delete_spot(store, &id).await?;
            println!("Deleted spot {id}.");
            Ok(())
        }
        CompanyCommand::Bookings => {
            store::bookings::fetch_company_bookings(store).await?;
            let state = store.read().await;
            print_company_bookings(&state.bookings.company);
            Ok(())
        }
    }
}

async fn run_admin(store: &Store, command: AdminCommand) -> Result<(), String> {
    match command {
        AdminCommand::Users {
            role,
            active,
            search,
            limit,
        } => {
            let query = UserQuery {
                role: role.map(UserRole::from),
                is_active: active,
                search,
                limit,
                ..UserQuery::default()
            };
            store::users::fetch_users(store, &query).await?;
            let state = store.read().await;
            print_users(&state.users.items, state.users.total);
            Ok(())
        }
        AdminCommand::Activate { id } => {
            store::users::set_user_active(store, &id, true).await?;
            println!("User {id} activated.");
            Ok(())
        }
        AdminCommand::Deactivate { id } => {
            store::users::set_user_active(store, &id, false).await?;
            println!("User {id} deactivated.");
            Ok(())
        }
        AdminCommand::ShowUser { id } => {
            let user = store::users::fetch_user(store, &id).await?;
            print_user_detail(&user);
            Ok(())
        }
        AdminCommand::PendingSpots => {
            store::tourist_spots::fetch_pending_spots(store).await?;
            let state = store.read().await;
            print_spots(&state.spots.pending);
            Ok(())
        }
        AdminCommand::ApproveSpot { id } => {
            let spot = store::tourist_spots::approve_spot(store, &id).await?;
            println!("Spot {} is now {}.", spot.id, spot.status);
            Ok(())
        }
        AdminCommand::RejectSpot { id } => {
            let spot = store::tourist_spots::reject_spot(store, &id).await?;
            println!("Spot {} is now {}.", spot.id, spot.status);
            Ok(())
        }
    }
}

async fn run_profile(store: &Store, command: ProfileCommand) -> Result<(), String> {
    match command {
        ProfileCommand::Show => {
            let user = store::auth::fetch_me(store).await?;
            print_user_detail(&user);
            Ok(())
        }
        ProfileCommand::Update {
            full_name,
            phone,
            picture,
        } => {
            let update = ProfileUpdate {
                full_name,
                phone_number: phone,
                profile_picture: picture,
            };
            let user = store::users::update_profile(store, &update).await?;
            println!("Profile updated for {}", user.email);
            Ok(())
        }
        ProfileCommand::ChangePassword { old, new } => {
            store::auth::change_password(store, &old, &new).await?;
            println!("Password changed.");
            Ok(())
        }
    }
}

// ============================================================================
// Output Helpers
// ============================================================================

fn print_spots(spots: &[TouristSpot]) {
    if spots.is_empty() {
        println!("No tourist spots found.");
        return;
    }
    println!(
        "{:<10}  {:<28}  {:<14}  {:<9}  {:>6}",
        "ID", "NAME", "REGION", "STATUS", "RATING"
    );
    println!("{}", "-".repeat(76));
    for spot in spots {
        println!(
            "{:<10}  {:<28}  {:<14}  {:<9}  {:>6.1}",
            truncate(&spot.id, 10),
            truncate(&spot.name, 28),
            truncate(spot.region.as_deref().unwrap_or("-"), 14),
            spot.status,
            spot.rating
        );
    }
}

fn print_spot_detail(spot: &TouristSpot) {
    println!("=== {} ===", spot.name);
    println!("Id:          {}", spot.id);
    println!("Status:      {}", spot.status);
    println!("Region:      {}", spot.region.as_deref().unwrap_or("-"));
    if !spot.categories.is_empty() {
        println!("Categories:  {}", spot.categories.join(", "));
    }
    println!("Rating:      {:.1} ({} ratings)", spot.rating, spot.total_ratings);
    println!("Location:    {}", spot.location.address);
    if let Some(best_time) = &spot.best_time_to_visit {
        println!("Best time:   {best_time}");
    }
    println!();
    println!("{}", spot.description);
}

fn print_packages(packages: &[TourPackage]) {
    if packages.is_empty() {
        println!("No tour packages found.");
        return;
    }
    println!(
        "{:<10}  {:<28}  {:>10}  {:>6}  {:>6}  {:<8}",
        "ID", "NAME", "PRICE", "DAYS", "SLOTS", "STATUS"
    );
    println!("{}", "-".repeat(80));
    for package in packages {
        println!(
            "{:<10}  {:<28}  {:>10.2}  {:>6}  {:>6}  {:<8}",
            truncate(&package.id, 10),
            truncate(&package.name, 28),
            package.price,
            package.duration_days,
            package.available_slots(),
            package.status
        );
    }
}

fn print_package_detail(package: &TourPackage) {
    println!("=== {} ===", package.name);
    println!("Id:           {}", package.id);
    println!("Status:       {}", package.status);
    println!("Price:        {:.2}", package.price);
    println!("Duration:     {} days", package.duration_days);
    println!(
        "Capacity:     {}/{} taken, {} open",
        package.current_participants,
        package.max_participants,
        package.available_slots()
    );
    println!(
        "Rating:       {:.1} ({} ratings)",
        package.average_rating, package.total_ratings
    );
    if let Some(category) = &package.category {
        println!("Category:     {category}");
    }
    if let Some(level) = &package.difficulty_level {
        println!("Difficulty:   {level}");
    }
    if !package.destinations.is_empty() {
        println!("Destinations: {}", package.destinations.join(", "));
    }
    if !package.available_dates.is_empty() {
        let days: Vec<String> = package
            .available_dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        println!("Dates:        {}", days.join(", "));
    }
    println!();
    println!("{}", package.description);
    if !package.itinerary.is_empty() {
        println!();
        println!("Itinerary:");
        for day in &package.itinerary {
            println!("  Day {}: {}", day.day, day.title);
        }
    }
}

fn print_bookings(bookings: &[Booking]) {
    if bookings.is_empty() {
        println!("No bookings found.");
        return;
    }
    println!(
        "{:<12}  {:<12}  {:<10}  {:>6}  {:>10}  {:<12}",
        "REFERENCE", "TARGET", "STATUS", "PEOPLE", "TOTAL", "TRAVEL DATE"
    );
    println!("{}", "-".repeat(74));
    for booking in bookings {
        let reference = booking.booking_reference.as_deref().unwrap_or(&booking.id);
        let target = booking
            .tour_package_id
            .as_deref()
            .or(booking.tourist_spot_id.as_deref())
            .unwrap_or("-");
        let travel = booking
            .travel_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12}  {:<12}  {:<10}  {:>6}  {:>10.2}  {:<12}",
            truncate(reference, 12),
            truncate(target, 12),
            booking.status,
            booking.participants_count,
            booking.total_amount,
            travel
        );
    }
}

fn print_company_bookings(rows: &[BookingSummary]) {
    if rows.is_empty() {
        println!("No bookings found.");
        return;
    }
    println!(
        "{:<12}  {:<20}  {:<20}  {:<10}  {:>6}  {:>10}",
        "REFERENCE", "TOURIST", "PACKAGE", "STATUS", "PEOPLE", "TOTAL"
    );
    println!("{}", "-".repeat(90));
    for row in rows {
        let booking = &row.booking;
        let reference = booking.booking_reference.as_deref().unwrap_or(&booking.id);
        let tourist = row
            .user
            .as_ref()
            .map(|u| u.full_name.as_str())
            .unwrap_or("-");
        let package = row
            .tour_package
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("-");
        println!(
            "{:<12}  {:<20}  {:<20}  {:<10}  {:>6}  {:>10.2}",
            truncate(reference, 12),
            truncate(tourist, 20),
            truncate(package, 20),
            booking.status,
            booking.participants_count,
            booking.total_amount
        );
    }
}

fn print_ratings(ratings: &[Rating]) {
    if ratings.is_empty() {
        println!("No ratings found.");
        return;
    }
    for rating in ratings {
        println!(
            "[{}/5] package {} by {}",
            rating.rating, rating.tour_package_id, rating.tourist_id
        );
        if let Some(review) = &rating.review {
            println!("      {review}");
        }
    }
}

fn print_spot_ratings(ratings: &[SpotRating]) {
    if ratings.is_empty() {
        println!("No ratings found.");
        return;
    }
    for rating in ratings {
        println!(
            "[{}/5] spot {} by {}",
            rating.rating, rating.tourist_spot_id, rating.tourist_id
        );
        if let Some(review) = &rating.review {
            println!("      {review}");
        }
    }
}

fn print_users(users: &[User], total: u64) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    println!(
        "{:<10}  {:<26}  {:<20}  {:<14}  {:<8}",
        "ID", "EMAIL", "NAME", "ROLE", "ACTIVE"
    );
    println!("{}", "-".repeat(86));
    for user in users {
        println!(
            "{:<10}  {:<26}  {:<20}  {:<14}  {:<8}",
            truncate(&user.id, 10),
            truncate(&user.email, 26),
            truncate(&user.full_name, 20),
            user.role,
            if user.is_active { "yes" } else { "no" }
        );
    }
    println!();
    println!("{} of {} users shown.", users.len(), total);
}

fn print_user_detail(user: &User) {
    println!("Id:          {}", user.id);
    println!("Email:       {}", user.email);
    println!("Name:        {}", user.full_name);
    println!("Role:        {}", user.role);
    println!("Active:      {}", if user.is_active { "yes" } else { "no" });
    if let Some(phone) = &user.phone_number {
        println!("Phone:       {phone}");
    }
    if let Some(last_login) = user.last_login {
        println!("Last login:  {}", last_login.format("%Y-%m-%d %H:%M UTC"));
    }
}

/// Truncate a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
