pub mod welcome_seeder;
