pub mod city;
pub mod arrival_point;
pub mod route;
pub mod route_stop;
pub mod carriage_type;
pub mod carriage;
pub mod ticket;
pub mod order;
pub mod user;
pub mod discount;
pub mod discount_type;
