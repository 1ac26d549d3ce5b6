#![allow(dead_code)]

use serde_json::{json, Value};

pub fn flight_details_json(id: i64) -> Value {
    json!({
        "id": id,
        "departureLocation": "Berlin",
        "arrivalLocation": "Rome",
        "departureTime": "2024-07-01T08:00:00",
        "arrivalTime": "2024-07-01T10:15:00",
        "duration": "2h 15m",
        "airline": "Lufthansa",
        "availableSeats": [
            {"seatOption": "WINDOW", "classType": "BUSINESS", "price": 250.0, "amount": 2},
            {"seatOption": "AISLE", "classType": "ECONOMY", "price": 80.0, "amount": 3}
        ],
        "luggageOptions": [
            {"name": "Cabin bag", "description": "8 kg cabin bag", "weightLimit": 8, "price": 0},
            {"name": "Checked bag", "description": "One checked bag", "weightLimit": 23, "price": 35}
        ],
        "prices": {"BUSINESS": 250.0, "ECONOMY": 80.0},
        "priceHistory": {
            "historyByClass": {
                "ECONOMY": [
                    {"price": 100.0, "timestamp": "2024-01-01T09:00:00"},
                    {"price": 120.0, "timestamp": "2024-01-02T09:00:00"}
                ],
                "BUSINESS": [
                    {"price": 80.0, "timestamp": "2024-01-02T12:00:00"}
                ]
            }
        }
    })
}

pub fn flight_summary_json(id: i64) -> Value {
    json!({
        "id": id,
        "departureLocation": "Berlin",
        "arrivalLocation": "Rome",
        "departureTime": "2024-07-01T08:00:00",
        "arrivalTime": "2024-07-01T10:15:00",
        "airline": "Lufthansa",
        "duration": "2h 15m",
        "minPrice": 80.0,
        "classTypes": ["ECONOMY", "BUSINESS"]
    })
}
